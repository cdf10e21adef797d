//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and defaults are kept if none is usable.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override the fallback cooldown
    pub fn with_default_cooldown(mut self, minutes: Option<u64>) -> Self {
        if let Some(m) = minutes {
            self.config.notifications.default_cooldown_minutes = m;
        }
        self
    }

    /// Override the retention window
    pub fn with_retention(mut self, hours: Option<u64>) -> Self {
        if let Some(h) = hours {
            self.config.notifications.max_retention_hours = h;
        }
        self
    }

    /// Override terminal coloring
    pub fn with_color(mut self, color: Option<bool>) -> Self {
        if let Some(c) = color {
            self.config.notifiers.color = c;
        }
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
