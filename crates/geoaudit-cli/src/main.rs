use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use geoaudit_cli::{
    CliCommand, parse_arguments, print_help, print_version, render, render_error, run_audit,
};
use geoaudit_core::{LlmConfig, YandexGptClient};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("geoaudit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let raw_args = env::args().skip(1).collect::<Vec<_>>();
    let options = match parse_arguments(&raw_args)? {
        CliCommand::Run(options) => options,
        CliCommand::Help => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }
        CliCommand::Version => {
            print_version();
            return Ok(ExitCode::SUCCESS);
        }
    };

    init_tracing();

    let llm_config = LlmConfig::from_env();
    llm_config.log_redacted();
    let client = YandexGptClient::new(llm_config).context("failed to build completion client")?;

    match run_audit(&options, client).await {
        Ok(output) => {
            println!("{}", render(&output, options.compact)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %err, "Audit failed");
            println!("{}", render_error(&err, options.compact)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
