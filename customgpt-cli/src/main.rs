mod api;
mod cli;
mod config;
mod logging;
mod services;
#[cfg(test)]
mod testing;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::debug;

use crate::api::{CustomGptClient, Executor, ResilienceConfig};
use crate::cli::commands::dispatch;
use crate::cli::output::configure_color;
use crate::cli::{AppContext, Cli};
use crate::config::{Config, Overrides};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    configure_color(cli.no_color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        api_key: cli.api_key.clone(),
        base_url: cli.base_url.clone(),
        max_retries: cli.max_retries,
    };
    let config = Config::load(cli.config.as_deref(), &overrides)?;
    logging::init(&config.log_level, config.log_file.as_deref())?;
    debug!(
        "Using {} (max retries {}, timeout {}s)",
        config.base_url, config.max_retries, config.timeout_secs
    );

    let credentials = config.credentials()?;
    let client = CustomGptClient::new(
        config.base_url.clone(),
        credentials,
        Duration::from_secs(config.timeout_secs),
    )
    .context("Failed to create API client")?;
    let executor = Executor::new(Arc::new(client), ResilienceConfig::from_config(&config));

    dispatch(cli.command, &AppContext::new(executor)).await
}
