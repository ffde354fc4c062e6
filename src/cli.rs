//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for shortgate using clap's derive macros.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::services::Role;

/// Shortgate - short link resolution and lifecycle management
#[derive(Parser, Debug)]
#[command(name = "shortgate")]
#[command(version)]
#[command(about = "Short link resolution and lifecycle management", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    /// Identity the command runs as
    #[arg(long = "as", global = true, default_value = "cli")]
    pub caller_id: String,

    /// Role of the calling identity (USER or ADMIN)
    #[arg(long, global = true, default_value = "USER")]
    pub role: Role,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a short link owned by the caller
    Create {
        /// Target URL (absolute http/https)
        target_url: String,

        /// Custom short code (3-20 chars of letters, digits, '_' or '-')
        #[arg(long)]
        code: Option<String>,

        /// Expiration time (RFC3339)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },

    /// Resolve a short code and record the visit
    Resolve {
        code: String,

        /// Client IP recorded with the visit
        #[arg(long, default_value = "127.0.0.1")]
        ip: String,

        #[arg(long)]
        user_agent: Option<String>,

        #[arg(long)]
        referrer: Option<String>,
    },

    /// List links of an owner (default: the caller), newest first
    List {
        #[arg(long)]
        owner: Option<String>,
    },

    /// List every link page by page (ADMIN only)
    ListAll {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 20)]
        page_size: u64,
    },

    /// Show click and visit statistics of a link
    Stats {
        /// Link id
        link_id: String,
    },

    /// Activate/deactivate a link or change its expiration
    Update {
        /// Link id
        link_id: String,

        #[arg(long)]
        active: Option<bool>,

        /// New expiration time (RFC3339)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },

    /// Delete a link and its visit history
    Delete {
        /// Link id
        link_id: String,
    },

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_with_globals() {
        let cli = Cli::try_parse_from([
            "shortgate",
            "-c",
            "custom.toml",
            "--as",
            "alice",
            "create",
            "https://example.com/a",
            "--code",
            "abc123",
        ])
        .unwrap();

        assert_eq!(cli.config, "custom.toml");
        assert_eq!(cli.caller_id, "alice");
        assert_eq!(cli.role, Role::User);
        match cli.command {
            Commands::Create {
                target_url, code, ..
            } => {
                assert_eq!(target_url, "https://example.com/a");
                assert_eq!(code.as_deref(), Some("abc123"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_role_and_update_flags() {
        let cli = Cli::try_parse_from([
            "shortgate",
            "update",
            "some-id",
            "--active",
            "false",
            "--role",
            "admin",
        ])
        .unwrap();

        assert_eq!(cli.role, Role::Admin);
        assert!(matches!(
            cli.command,
            Commands::Update {
                active: Some(false),
                expires_at: None,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_expiry_is_rejected() {
        let result = Cli::try_parse_from([
            "shortgate",
            "create",
            "https://example.com",
            "--expires-at",
            "tomorrow",
        ]);
        assert!(result.is_err());
    }
}
