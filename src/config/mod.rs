//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::alerts::NotificationSettings;
use crate::domain::validate_threshold;
use crate::error::ConfigError;
use crate::services::AlertServiceConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Notification policy settings
    pub notifications: NotificationSettings,
    /// Default threshold per resource type
    pub thresholds: BTreeMap<String, f64>,
    /// Delivery channel settings
    pub notifiers: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = [("cpu", 80.0), ("memory", 85.0), ("disk", 90.0)]
            .into_iter()
            .map(|(resource, threshold)| (resource.to_string(), threshold))
            .collect();

        Self {
            general: GeneralConfig::default(),
            notifications: NotificationSettings::default(),
            thresholds,
            notifiers: NotifierConfig::default(),
        }
    }
}

impl Config {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.cleanup_interval_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "general.cleanup_interval_minutes".to_string(),
                message: "must be at least 1 minute".to_string(),
            });
        }

        for (resource, threshold) in &self.thresholds {
            validate_threshold(*threshold).map_err(|e| ConfigError::InvalidValue {
                key: format!("thresholds.{}", resource),
                message: e.to_string(),
            })?;
        }

        self.notifications.validate()
    }

    /// Build the alert service configuration
    pub fn to_service_config(&self) -> AlertServiceConfig {
        AlertServiceConfig {
            policy: self.notifications.to_policy_config(),
            cleanup_interval: Duration::from_secs(
                self.general.cleanup_interval_minutes.saturating_mul(60),
            ),
            thresholds: self.thresholds.clone(),
        }
    }
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Minutes between history cleanups
    pub cleanup_interval_minutes: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            cleanup_interval_minutes: 60,
        }
    }
}

/// Delivery channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Print alerts to the terminal
    pub terminal: bool,
    /// Also emit alerts through the log; at the default log level this
    /// repeats every terminal alert on stderr
    pub log: bool,
    /// Colorize terminal alerts
    pub color: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            terminal: true,
            log: false,
            color: true,
        }
    }
}
