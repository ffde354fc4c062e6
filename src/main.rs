use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use shortgate::cli::{Cli, Commands};
use shortgate::config::{get_config, init_config_from};
use shortgate::errors::ShortgateError;
use shortgate::interfaces::cli::commands::config_gen::generate_config;
use shortgate::interfaces::cli::run_cli_command;
use shortgate::runtime::AppContext;
use shortgate::services::Caller;
use shortgate::system::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ShortgateError>() {
            Some(err) => {
                eprintln!("{}", err.format_colored());
                // 领域错误（输入或状态问题）与基础设施故障使用不同的退出码
                if err.is_domain_error() {
                    ExitCode::from(2)
                } else {
                    ExitCode::FAILURE
                }
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let caller = Caller {
        id: cli.caller_id,
        role: cli.role,
    };

    // 生成配置不需要连接数据库
    if let Commands::GenerateConfig { output_path, force } = cli.command {
        return generate_config(output_path, force).map_err(anyhow::Error::from);
    }

    init_config_from(&cli.config);
    let config = get_config();
    let _guard = init_logging(&config.logging);
    debug!("Running as {} ({})", caller.id, caller.role);

    let ctx = AppContext::init(&config)
        .await
        .context("Failed to initialize application")?;

    let result = run_cli_command(cli.command, &ctx, &caller).await;
    ctx.close().await;

    result.map_err(anyhow::Error::from)
}
