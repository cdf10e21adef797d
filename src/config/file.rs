//! Configuration file loading
//!
//! Handles loading and saving configuration as TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Option<Config> {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(config: &Config, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))?;

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)
        };

        write().map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Per-user configuration path
    pub fn user_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("healwatch").join("config.toml"),
            None => PathBuf::from("healwatch.toml"),
        }
    }

    /// Get default configuration file paths, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/healwatch/config.toml"));

        // User config
        if dirs::config_dir().is_some() {
            paths.push(Self::user_path());
        }

        // Current directory
        paths.push(PathBuf::from("healwatch.toml"));
        paths.push(PathBuf::from(".healwatch.toml"));

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths_not_empty() {
        let paths = ConfigFile::default_paths();
        assert!(!paths.is_empty());
        assert_eq!(paths[0], PathBuf::from("/etc/healwatch/config.toml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.notifications.default_cooldown_minutes = 7;
        ConfigFile::save(&config, &path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[notifications]\nmax_retention_hours = 48\n\n[thresholds]\ncpu = 70.0\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.notifications.max_retention_hours, 48);
        assert_eq!(config.notifications.default_cooldown_minutes, 15);
        assert_eq!(config.thresholds.len(), 1);
        assert!(config.notifiers.terminal);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[thresholds]\ncpu = 0.0\n").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[notifications\n").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::TomlError(_))
        ));
    }
}
