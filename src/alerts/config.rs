//! Notification policy settings
//!
//! TOML-friendly form of [`PolicyConfig`]: whole minutes and hours, severity
//! cooldowns keyed by level name.

use super::manager::PolicyConfig;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Level names that may carry a cooldown
pub const COOLDOWN_LEVELS: [&str; 4] = ["critical", "error", "warning", "info"];

/// Notification settings as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Fallback cooldown in minutes
    pub default_cooldown_minutes: u64,
    /// Cooldown in minutes per severity level
    pub severity_cooldowns: BTreeMap<String, u64>,
    /// Retention window in hours
    pub max_retention_hours: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        let severity_cooldowns = [("critical", 5), ("error", 10), ("warning", 15), ("info", 15)]
            .into_iter()
            .map(|(level, minutes)| (level.to_string(), minutes))
            .collect();

        Self {
            default_cooldown_minutes: 15,
            severity_cooldowns,
            max_retention_hours: 24,
        }
    }
}

impl NotificationSettings {
    /// Check for values that would disable the policy
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retention_hours == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.max_retention_hours".to_string(),
                message: "must be at least 1 hour".to_string(),
            });
        }

        for level in self.severity_cooldowns.keys() {
            if !COOLDOWN_LEVELS.contains(&level.to_lowercase().as_str()) {
                log::warn!(
                    "Ignoring cooldown for unknown severity '{}' (known: {})",
                    level,
                    COOLDOWN_LEVELS.join(", ")
                );
            }
        }

        Ok(())
    }

    /// Convert to the policy configuration
    pub fn to_policy_config(&self) -> PolicyConfig {
        let minutes = |m: u64| Duration::from_secs(m.saturating_mul(60));

        PolicyConfig {
            default_cooldown: minutes(self.default_cooldown_minutes),
            severity_cooldowns: self
                .severity_cooldowns
                .iter()
                .map(|(level, m)| (level.to_lowercase(), minutes(*m)))
                .collect(),
            max_retention: Duration::from_secs(self.max_retention_hours.saturating_mul(3600)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_defaults() {
        assert_eq!(
            NotificationSettings::default().to_policy_config(),
            PolicyConfig::default()
        );
    }

    #[test]
    fn test_partial_toml() {
        let settings: NotificationSettings = toml::from_str(
            r#"
            default_cooldown_minutes = 30
            [severity_cooldowns]
            Critical = 1
            "#,
        )
        .unwrap();

        assert_eq!(settings.max_retention_hours, 24);
        let policy = settings.to_policy_config();
        assert_eq!(policy.default_cooldown, Duration::from_secs(1800));
        assert_eq!(
            policy.severity_cooldowns.get("critical"),
            Some(&Duration::from_secs(60))
        );
        // An explicit table replaces the default levels entirely
        assert_eq!(policy.severity_cooldowns.len(), 1);
    }

    #[test]
    fn test_validate() {
        let mut settings = NotificationSettings::default();
        assert!(settings.validate().is_ok());

        settings.severity_cooldowns.insert("emergency".to_string(), 1);
        assert!(settings.validate().is_ok());

        settings.max_retention_hours = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
