//! Alert service
//!
//! Runs one monitor observation through the notification policy: gate on
//! the threshold, decide, dispatch, record on successful delivery, and purge
//! stale history on the cleanup schedule.

use crate::alerts::{
    AlertEvent, Clock, Decision, Dispatcher, NotificationManager, NotificationStats, PolicyConfig,
};
use crate::domain::{classify_severity, Observation, Severity};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

/// Alert service configuration
#[derive(Debug, Clone)]
pub struct AlertServiceConfig {
    /// Notification policy
    pub policy: PolicyConfig,
    /// Minimum time between history cleanups
    pub cleanup_interval: Duration,
    /// Default threshold per resource type
    pub thresholds: BTreeMap<String, f64>,
}

impl Default for AlertServiceConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            cleanup_interval: Duration::from_secs(3600),
            thresholds: BTreeMap::new(),
        }
    }
}

/// What happened to one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Outcome {
    /// Reading did not exceed its threshold
    BelowThreshold { threshold: f64 },
    /// Policy held the alert back
    Suppressed { threshold: f64, severity: Severity },
    /// Alert delivered and recorded
    Notified(AlertEvent),
    /// Every channel failed; nothing recorded so the next poll retries
    DeliveryFailed { event: AlertEvent, error: String },
}

impl Outcome {
    /// Whether an alert went out
    pub fn is_notified(&self) -> bool {
        matches!(self, Self::Notified(_))
    }
}

/// Alert service for process monitoring
pub struct AlertService<C: Clock> {
    manager: NotificationManager<C>,
    dispatcher: Dispatcher,
    thresholds: BTreeMap<String, f64>,
    cleanup_interval: Duration,
    last_cleanup: SystemTime,
    purged: usize,
}

impl<C: Clock> AlertService<C> {
    /// Create a new alert service
    pub fn new(config: AlertServiceConfig, clock: C, dispatcher: Dispatcher) -> Self {
        let last_cleanup = clock.now();
        let manager = NotificationManager::with_clock(config.policy, clock);

        Self {
            manager,
            dispatcher,
            thresholds: config.thresholds,
            cleanup_interval: config.cleanup_interval,
            last_cleanup,
            purged: 0,
        }
    }

    /// Process one observation
    ///
    /// A due cleanup runs first, even when the observation is then rejected.
    pub fn observe(&mut self, observation: &Observation) -> Result<Outcome> {
        self.maybe_cleanup();
        observation.validate()?;
        let threshold = observation.resolve_threshold(&self.thresholds)?;
        Ok(self.evaluate(observation, threshold))
    }

    fn evaluate(&mut self, observation: &Observation, threshold: f64) -> Outcome {
        let Observation {
            process_key,
            resource_type,
            value,
            ..
        } = observation;

        if *value < threshold {
            return Outcome::BelowThreshold { threshold };
        }

        let severity = classify_severity(*value, threshold);
        let reason = match self
            .manager
            .should_notify(process_key, resource_type, *value, threshold)
        {
            Decision::Notify(reason) => reason,
            Decision::Suppress => return Outcome::Suppressed { threshold, severity },
        };

        let event = AlertEvent::new(
            process_key,
            resource_type,
            *value,
            threshold,
            severity,
            reason,
            self.manager.clock().now(),
        );

        match self.dispatcher.dispatch(&event) {
            Ok(_) => {
                self.manager
                    .record_notification(process_key, resource_type, *value, severity);
                Outcome::Notified(event)
            }
            Err(e) => {
                log::warn!(
                    "Failed to deliver alert for {}/{}: {}",
                    process_key,
                    resource_type,
                    e
                );
                Outcome::DeliveryFailed {
                    event,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Purge stale history if the cleanup interval has elapsed
    ///
    /// Returns the number of records removed, `None` if not yet due.
    pub fn maybe_cleanup(&mut self) -> Option<usize> {
        let now = self.manager.clock().now();
        let due = now
            .duration_since(self.last_cleanup)
            .map(|elapsed| elapsed >= self.cleanup_interval)
            .unwrap_or(false);
        if !due {
            return None;
        }

        self.last_cleanup = now;
        let removed = self.manager.cleanup_old_entries();
        self.purged += removed;
        Some(removed)
    }

    /// Records purged by scheduled cleanups so far
    pub fn purged_total(&self) -> usize {
        self.purged
    }

    /// Notification statistics
    pub fn stats(&self) -> NotificationStats {
        self.manager.get_stats()
    }

    /// Underlying notification manager
    pub fn manager(&self) -> &NotificationManager<C> {
        &self.manager
    }

    /// Number of delivery channels
    pub fn notifier_count(&self) -> usize {
        self.dispatcher.notifier_count()
    }
}
