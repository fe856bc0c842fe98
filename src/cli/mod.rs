//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for elastictl using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// elastictl - Elasticsearch index export tool
#[derive(Parser, Debug)]
#[command(name = "elastictl")]
#[command(version, about, long_about = None)]
#[command(author = "elastictl Contributors")]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(short, long, default_value = "elastictl.toml", env = "ELASTICTL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ELASTICTL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export an index definition and all its documents as NDJSON
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
