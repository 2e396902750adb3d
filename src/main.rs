use std::env;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use emotionary::cli::{self, Cli};
use emotionary::config::{AppConfig, Settings};
use emotionary::logging::init_logging;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::default(),
    };
    let settings = Settings::resolve(&config).context("invalid configuration")?;
    let settings = cli::apply_overrides(&args, settings);
    init_logging(&settings.log_level);
    debug!(api_base = %settings.api_base, zone = %settings.zone, "starting");
    cli::cli(args, settings).await
}
