// elastictl - Elasticsearch Index Export Tool
// Copyright (c) 2025 elastictl Contributors
// Licensed under the MIT License

use clap::Parser;
use elastictl::cli::{Cli, Commands};
use elastictl::config::{load_config_or_default, LoggingConfig};
use elastictl::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = load_config_or_default(&cli.config);

    let (log_level, logging_config) = match &loaded {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "elastictl - Elasticsearch index export tool"
    );

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    loaded: elastictl::domain::Result<elastictl::config::ElastictlConfig>,
) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => match loaded {
            Ok(config) => args.execute(config).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                Ok(2)
            }
        },
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
    }
}
