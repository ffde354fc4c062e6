//! Generate config command

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{Result, ShortgateError};

/// Generate example configuration file
pub fn generate_config(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if std::path::Path::new(&path).exists() && !force {
        return Err(ShortgateError::config(format!(
            "{} already exists; pass --force to overwrite",
            path
        )));
    }

    eprintln!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        ShortgateError::config(format!("Unable to write configuration file: {}", e))
    })?;

    eprintln!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_refuses_to_overwrite_without_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_string_lossy().into_owned();

        generate_config(Some(path_str.clone()), false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[links]"));

        let err = generate_config(Some(path_str.clone()), false).unwrap_err();
        assert!(matches!(err, ShortgateError::Config(_)));

        generate_config(Some(path_str), true).unwrap();
    }
}
