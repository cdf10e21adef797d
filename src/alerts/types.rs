//! Alert system domain types
//!
//! Records, decisions and events exchanged between the notification policy,
//! the monitors feeding it and the channels delivering alerts.

use crate::domain::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Last notification sent for one (process key, resource type) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// When the most recent alert was sent
    pub last_notified_at: SystemTime,
    /// Reading at that time
    pub last_value: f64,
    /// Severity at that time
    pub last_severity: Severity,
}

/// Why a notification was allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyReason {
    /// Nothing recorded for this pair yet
    FirstDetection,
    /// Cooldown of the previously recorded severity has elapsed
    CooldownExpired,
    /// Severity ranks above the previously recorded one
    SeverityIncreased,
}

impl NotifyReason {
    /// Snake-case reason name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstDetection => "first_detection",
            Self::CooldownExpired => "cooldown_expired",
            Self::SeverityIncreased => "severity_increased",
        }
    }
}

impl fmt::Display for NotifyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a notification check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    /// Send the alert
    Notify(NotifyReason),
    /// Still within cooldown and severity has not worsened
    Suppress,
}

impl Decision {
    /// Whether an alert should be sent
    pub fn should_notify(&self) -> bool {
        matches!(self, Self::Notify(_))
    }

    /// Reason for notifying, `None` when suppressed
    pub fn reason(&self) -> Option<NotifyReason> {
        match self {
            Self::Notify(reason) => Some(*reason),
            Self::Suppress => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notify(reason) => write!(f, "notify ({})", reason),
            Self::Suppress => write!(f, "suppressed"),
        }
    }
}

/// Aggregate view of the notification history
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationStats {
    /// Distinct process keys with at least one record
    pub tracked_processes: usize,
    /// Records across all process keys
    pub total_entries: usize,
    /// Age after which records are purged
    pub max_retention: Duration,
    /// Cooldown for severities without their own entry
    pub default_cooldown: Duration,
    /// Cooldown per severity level name
    pub severity_cooldowns: BTreeMap<String, Duration>,
}

/// Alert produced for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Monitored entity
    pub process_key: String,
    /// Metric category
    pub resource_type: String,
    /// Reading that triggered the alert
    pub value: f64,
    /// Threshold it exceeded
    pub threshold: f64,
    /// Classified severity
    pub severity: Severity,
    /// Why the policy let it through
    pub reason: NotifyReason,
    /// When the alert was raised
    pub timestamp: SystemTime,
    /// Human-readable summary
    pub message: String,
}

impl AlertEvent {
    /// Create an alert event with a generated message
    pub fn new(
        process_key: &str,
        resource_type: &str,
        value: f64,
        threshold: f64,
        severity: Severity,
        reason: NotifyReason,
        timestamp: SystemTime,
    ) -> Self {
        let message = format!(
            "{} {} at {:.2} exceeds threshold {:.2} ({})",
            process_key, resource_type, value, threshold, reason
        );

        Self {
            process_key: process_key.to_string(),
            resource_type: resource_type.to_string(),
            value,
            threshold,
            severity,
            reason,
            timestamp,
            message,
        }
    }
}
