//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ElastictlConfig;
use super::secret::secret_string_opt;
use crate::domain::errors::ElastictlError;
use crate::domain::result::Result;
use crate::domain::KeepAlive;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ElastictlConfig
/// 4. Applies environment variable overrides (ELASTICTL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing or substitution
/// fails, or the resulting configuration is invalid.
///
/// # Examples
///
/// ```no_run
/// use elastictl::config::loader::load_config;
///
/// let config = load_config("elastictl.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ElastictlConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ElastictlError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ElastictlError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ElastictlConfig = toml::from_str(&contents)
        .map_err(|e| ElastictlError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration from `path` if it exists, otherwise starts from defaults
///
/// Environment overrides and validation apply in both cases, so the tool can
/// run with nothing but command-line flags.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ElastictlConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    let mut config = ElastictlConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut ElastictlConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        ElastictlError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ElastictlError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comments are copied through untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ElastictlError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ELASTICTL_* prefix
///
/// Environment variables follow the pattern: ELASTICTL_<SECTION>_<KEY>
/// For example: ELASTICTL_BACKEND_BASE_URL, ELASTICTL_EXPORT_PAGE_SIZE
fn apply_env_overrides(config: &mut ElastictlConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ELASTICTL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Backend overrides
    if let Ok(val) = std::env::var("ELASTICTL_BACKEND_BASE_URL") {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("ELASTICTL_BACKEND_USERNAME") {
        config.backend.username = Some(val);
    }
    if let Ok(val) = std::env::var("ELASTICTL_BACKEND_PASSWORD") {
        config.backend.password = secret_string_opt(Some(val));
    }
    if let Ok(val) = std::env::var("ELASTICTL_BACKEND_TLS_VERIFY") {
        config.backend.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("ELASTICTL_BACKEND_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.backend.timeout_seconds = timeout;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("ELASTICTL_EXPORT_PAGE_SIZE") {
        config.export.page_size = val.parse().map_err(|_| {
            ElastictlError::Configuration(format!(
                "ELASTICTL_EXPORT_PAGE_SIZE must be a positive integer, got '{val}'"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("ELASTICTL_EXPORT_KEEP_ALIVE") {
        config.export.keep_alive = KeepAlive::parse(val).map_err(ElastictlError::Configuration)?;
    }
    if let Ok(val) = std::env::var("ELASTICTL_EXPORT_DEFAULT_SORT_FIELD") {
        config.export.default_sort_field = val;
    }
    if let Ok(val) = std::env::var("ELASTICTL_EXPORT_PROGRESS") {
        config.export.progress = val.parse().unwrap_or(true);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ELASTICTL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ELASTICTL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
