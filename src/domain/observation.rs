//! Resource observations supplied by process monitors

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single resource reading for a monitored entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Opaque identifier of the monitored process, container or service
    pub process_key: String,
    /// Metric category, e.g. "cpu" or "memory"
    pub resource_type: String,
    /// Current reading
    pub value: f64,
    /// Alerting threshold; falls back to the configured per-resource default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl Observation {
    /// Create an observation with an explicit threshold
    pub fn new(
        process_key: impl Into<String>,
        resource_type: impl Into<String>,
        value: f64,
        threshold: f64,
    ) -> Self {
        Self {
            process_key: process_key.into(),
            resource_type: resource_type.into(),
            value,
            threshold: Some(threshold),
        }
    }

    /// Validate keys, value and (if present) threshold
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.process_key.trim().is_empty() {
            return Err(DomainError::EmptyKey("process key"));
        }
        if self.resource_type.trim().is_empty() {
            return Err(DomainError::EmptyKey("resource type"));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(DomainError::InvalidValue(self.value));
        }
        if let Some(threshold) = self.threshold {
            validate_threshold(threshold)?;
        }
        Ok(())
    }

    /// Resolve the threshold, falling back to `defaults[resource_type]`
    pub fn resolve_threshold(&self, defaults: &BTreeMap<String, f64>) -> Result<f64, DomainError> {
        let threshold = match self.threshold {
            Some(t) => t,
            None => *defaults.get(&self.resource_type).ok_or_else(|| {
                DomainError::InvalidObservation(format!(
                    "no threshold given and none configured for resource '{}'",
                    self.resource_type
                ))
            })?,
        };
        validate_threshold(threshold)?;
        Ok(threshold)
    }
}

/// Thresholds must be positive and finite for classification to be meaningful
pub fn validate_threshold(threshold: f64) -> Result<(), DomainError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidThreshold(threshold))
    }
}
