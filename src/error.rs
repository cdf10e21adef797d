//! Unified error types for healwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.
//!
//! The notification policy itself never fails; these errors cover the
//! edges around it (configuration, observation parsing, alert delivery).

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Every notification channel failed to deliver an alert
    #[error("Alert delivery failed: {0}")]
    Delivery(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Severity name is not one of warning/error/critical
    #[error("Unknown severity level: {0} (expected warning, error or critical)")]
    UnknownSeverity(String),

    /// Threshold must be a positive, finite number
    #[error("Invalid threshold: {0} (must be greater than 0)")]
    InvalidThreshold(f64),

    /// Resource reading must be a non-negative, finite number
    #[error("Invalid resource value: {0}")]
    InvalidValue(f64),

    /// An identifying key was empty
    #[error("Empty {0}")]
    EmptyKey(&'static str),

    /// Observation could not be used
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::UnknownSeverity("fatal".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown severity level: fatal (expected warning, error or critical)"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            key: "thresholds.cpu".to_string(),
            message: "must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("thresholds.cpu"));
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_error_conversion() {
        let domain_err = DomainError::InvalidThreshold(0.0);
        let app_err: AppError = domain_err.into();
        assert!(matches!(app_err, AppError::Domain(_)));

        let config_err = ConfigError::FileNotFound("/nope".to_string());
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(_)));
    }
}
