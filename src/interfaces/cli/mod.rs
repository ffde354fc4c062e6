//! CLI interface module
//!
//! Executes one parsed command against the link service. Results go to
//! stdout as pretty JSON; progress notes go to stderr.

pub mod commands;

use serde::Serialize;

use crate::cli::Commands;
use crate::errors::Result;
use crate::runtime::AppContext;
use crate::services::Caller;

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, ctx: &AppContext, caller: &Caller) -> Result<()> {
    use commands::link_management as links;

    let service = ctx.link_service.as_ref();

    match cmd {
        Commands::Create {
            target_url,
            code,
            expires_at,
        } => links::create(service, caller, target_url, code, expires_at).await,
        Commands::Resolve {
            code,
            ip,
            user_agent,
            referrer,
        } => links::resolve(service, code, ip, user_agent, referrer).await,
        Commands::List { owner } => {
            let owner = owner.unwrap_or_else(|| caller.id.clone());
            links::list(service, &owner).await
        }
        Commands::ListAll { page, page_size } => {
            links::list_all(service, caller, page, page_size).await
        }
        Commands::Stats { link_id } => links::stats(service, caller, &link_id).await,
        Commands::Update {
            link_id,
            active,
            expires_at,
        } => links::update(service, caller, &link_id, active, expires_at).await,
        Commands::Delete { link_id } => links::delete(service, caller, &link_id).await,
        Commands::GenerateConfig { output_path, force } => {
            commands::config_gen::generate_config(output_path, force)
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
