//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the elastictl configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after substitution and env overrides
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Backend: {}", config.backend.base_url);
        println!(
            "  Authentication: {}",
            match &config.backend.username {
                Some(user) => format!("basic ({user})"),
                None => "none".to_string(),
            }
        );
        println!("  TLS Verify: {}", config.backend.tls_verify);
        println!("  Page Size: {}", config.export.page_size);
        println!("  Keep Alive: {}", config.export.keep_alive);
        println!("  Default Sort Field: {}", config.export.default_sort_field);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}
