//! Config command implementation
//!
//! Shows, creates and validates the configuration file.

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::cli::output::{print_output, Message};
use crate::config::{Config, ConfigFile};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Execute config commands
pub fn run_config(
    command: &ConfigCommands,
    config: &Config,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => run_config_show(config, format),
        ConfigCommands::Init { path, force } => {
            let path = path
                .clone()
                .or_else(|| config_path.map(PathBuf::from))
                .unwrap_or_else(ConfigFile::user_path);
            let message = init_config(&path, *force)?;
            print_output(&message, format)?;
            Ok(())
        }
        ConfigCommands::Check => {
            let message = check_config(config_path)?;
            print_output(&message, format)?;
            Ok(())
        }
    }
}

/// Print the effective configuration
fn run_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(config).map_err(ConfigError::from)?;
            println!("{}", json);
        }
        _ => {
            let text = toml::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))?;
            print!("{}", text);
        }
    }
    Ok(())
}

/// Write the default configuration to `path`
pub fn init_config(path: &Path, force: bool) -> Result<Message> {
    if path.exists() && !force {
        return Ok(Message {
            message: format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ),
            success: false,
        });
    }

    ConfigFile::save(&Config::default(), path)?;
    log::info!("Wrote default configuration to {}", path.display());

    Ok(Message {
        message: format!("Wrote default configuration to {}", path.display()),
        success: true,
    })
}

/// Validate the configuration file at `path`, or the first default location
pub fn check_config(path: Option<&str>) -> Result<Message> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => match ConfigFile::default_paths().into_iter().find(|p| p.exists()) {
            Some(p) => p,
            None => {
                return Ok(Message {
                    message: "No configuration file found, defaults are in effect".to_string(),
                    success: true,
                })
            }
        },
    };

    let config = ConfigFile::load(&path)?;
    Ok(Message {
        message: format!(
            "{} is valid ({} resource threshold(s), {} severity cooldown(s))",
            path.display(),
            config.thresholds.len(),
            config.notifications.severity_cooldowns.len()
        ),
        success: true,
    })
}
