//! Notification manager implementation
//!
//! Decides, per (process key, resource type) pair, whether a new alert may
//! fire. Escalation always bypasses cooldown; otherwise the cooldown of the
//! previously recorded severity must have elapsed. Records older than the
//! retention window are purged by `cleanup_old_entries`.

use super::clock::{elapsed_since, Clock, SystemClock};
use super::types::{Decision, NotificationRecord, NotificationStats, NotifyReason};
use crate::domain::{classify_severity, Severity};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Notification policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Cooldown for severities without their own entry
    pub default_cooldown: Duration,
    /// Cooldown per severity level name (critical, error, warning, info)
    pub severity_cooldowns: BTreeMap<String, Duration>,
    /// Records older than this are purged
    pub max_retention: Duration,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let minutes = |m: u64| Duration::from_secs(m * 60);
        let severity_cooldowns = [
            ("critical", minutes(5)),
            ("error", minutes(10)),
            ("warning", minutes(15)),
            ("info", minutes(15)),
        ]
        .into_iter()
        .map(|(level, cooldown)| (level.to_string(), cooldown))
        .collect();

        Self {
            default_cooldown: minutes(15),
            severity_cooldowns,
            max_retention: Duration::from_secs(24 * 3600),
        }
    }
}

impl PolicyConfig {
    /// Cooldown applying after a notification of `severity`
    pub fn cooldown_for(&self, severity: Severity) -> Duration {
        self.severity_cooldowns
            .get(severity.as_str())
            .copied()
            .unwrap_or(self.default_cooldown)
    }
}

/// Notification de-duplication and escalation policy
///
/// Holds the notification history for every monitored pair. Queries never
/// mutate it; only `record_notification` and `cleanup_old_entries` do.
pub struct NotificationManager<C: Clock = SystemClock> {
    /// Policy configuration
    config: PolicyConfig,
    /// process key -> resource type -> last notification
    history: HashMap<String, HashMap<String, NotificationRecord>>,
    /// Time source
    clock: C,
}

impl NotificationManager<SystemClock> {
    /// Create a notification manager on the wall clock
    pub fn new(config: PolicyConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> NotificationManager<C> {
    /// Create a notification manager on a custom clock
    pub fn with_clock(config: PolicyConfig, clock: C) -> Self {
        log::debug!("Creating notification manager with config: {:?}", config);
        Self {
            config,
            history: HashMap::new(),
            clock,
        }
    }

    /// Decide whether a reading should produce a notification
    pub fn should_notify(
        &self,
        process_key: &str,
        resource_type: &str,
        current_value: f64,
        threshold: f64,
    ) -> Decision {
        let current_severity = classify_severity(current_value, threshold);

        let Some(record) = self.record(process_key, resource_type) else {
            log::debug!(
                "{}/{}: first detection ({})",
                process_key,
                resource_type,
                current_severity
            );
            return Decision::Notify(NotifyReason::FirstDetection);
        };

        if current_severity.rank() > record.last_severity.rank() {
            log::debug!(
                "{}/{}: severity increased {} -> {}",
                process_key,
                resource_type,
                record.last_severity,
                current_severity
            );
            return Decision::Notify(NotifyReason::SeverityIncreased);
        }

        let cooldown = self.config.cooldown_for(record.last_severity);
        let elapsed = elapsed_since(self.clock.now(), record.last_notified_at);
        if elapsed >= cooldown {
            log::debug!(
                "{}/{}: cooldown of {:?} expired after {:?}",
                process_key,
                resource_type,
                cooldown,
                elapsed
            );
            return Decision::Notify(NotifyReason::CooldownExpired);
        }

        log::debug!(
            "{}/{}: suppressed, {:?} of {:?} cooldown elapsed",
            process_key,
            resource_type,
            elapsed,
            cooldown
        );
        Decision::Suppress
    }

    /// Record that a notification was sent
    ///
    /// Replaces any previous record for the pair.
    pub fn record_notification(
        &mut self,
        process_key: &str,
        resource_type: &str,
        value: f64,
        severity: Severity,
    ) {
        let record = NotificationRecord {
            last_notified_at: self.clock.now(),
            last_value: value,
            last_severity: severity,
        };

        self.history
            .entry(process_key.to_string())
            .or_default()
            .insert(resource_type.to_string(), record);

        log::info!(
            "Notification recorded: {}/{} {} at {:.2}",
            process_key,
            resource_type,
            severity,
            value
        );
    }

    /// Purge records older than the retention window
    ///
    /// Process keys left without records are removed too. Returns the
    /// number of records removed.
    pub fn cleanup_old_entries(&mut self) -> usize {
        let Some(cutoff) = self.clock.now().checked_sub(self.config.max_retention) else {
            return 0;
        };

        let mut removed = 0;
        self.history.retain(|process_key, resources| {
            let before = resources.len();
            resources.retain(|_, record| record.last_notified_at >= cutoff);
            let purged = before - resources.len();
            if purged > 0 {
                log::debug!("Purged {} stale record(s) for {}", purged, process_key);
            }
            removed += purged;
            !resources.is_empty()
        });

        if removed > 0 {
            log::info!(
                "Cleanup removed {} record(s), {} process(es) still tracked",
                removed,
                self.history.len()
            );
        }
        removed
    }

    /// Aggregate statistics over the current history
    pub fn get_stats(&self) -> NotificationStats {
        NotificationStats {
            tracked_processes: self.history.len(),
            total_entries: self.history.values().map(HashMap::len).sum(),
            max_retention: self.config.max_retention,
            default_cooldown: self.config.default_cooldown,
            severity_cooldowns: self.config.severity_cooldowns.clone(),
        }
    }

    /// Record for one pair, if any
    pub fn record(&self, process_key: &str, resource_type: &str) -> Option<&NotificationRecord> {
        self.history.get(process_key)?.get(resource_type)
    }

    /// All records for one process key
    pub fn records_for(&self, process_key: &str) -> Option<&HashMap<String, NotificationRecord>> {
        self.history.get(process_key)
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Policy configuration
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Time source
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl Default for NotificationManager<SystemClock> {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::ManualClock;
    use std::time::SystemTime;

    const MINUTE: Duration = Duration::from_secs(60);
    const SECOND: Duration = Duration::from_secs(1);

    fn manager() -> (NotificationManager<ManualClock>, ManualClock) {
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000));
        let manager = NotificationManager::with_clock(PolicyConfig::default(), clock.clone());
        (manager, clock)
    }

    #[test]
    fn test_default_config() {
        let config = PolicyConfig::default();
        assert_eq!(config.default_cooldown, 15 * MINUTE);
        assert_eq!(config.max_retention, Duration::from_secs(86_400));
        assert_eq!(config.cooldown_for(Severity::Critical), 5 * MINUTE);
        assert_eq!(config.cooldown_for(Severity::Error), 10 * MINUTE);
        assert_eq!(config.cooldown_for(Severity::Warning), 15 * MINUTE);
        assert_eq!(config.severity_cooldowns.get("info"), Some(&(15 * MINUTE)));
    }

    #[test]
    fn test_missing_severity_cooldown_falls_back() {
        let mut config = PolicyConfig::default();
        config.severity_cooldowns.remove("error");
        config.default_cooldown = 42 * MINUTE;
        assert_eq!(config.cooldown_for(Severity::Error), 42 * MINUTE);
    }

    #[test]
    fn test_first_detection() {
        let (manager, _) = manager();
        assert_eq!(
            manager.should_notify("web:1", "cpu", 81.0, 80.0),
            Decision::Notify(NotifyReason::FirstDetection)
        );
        assert_eq!(
            manager.should_notify("web:1", "cpu", 500.0, 80.0),
            Decision::Notify(NotifyReason::FirstDetection)
        );
    }

    #[test]
    fn test_first_detection_for_new_resource_of_known_process() {
        let (mut manager, _) = manager();
        manager.record_notification("web:1", "cpu", 81.0, Severity::Warning);
        assert_eq!(
            manager.should_notify("web:1", "memory", 81.0, 80.0),
            Decision::Notify(NotifyReason::FirstDetection)
        );
    }

    #[test]
    fn test_should_notify_does_not_mutate() {
        let (manager, _) = manager();
        manager.should_notify("web:1", "cpu", 99.0, 80.0);
        assert_eq!(manager.get_stats().total_entries, 0);
        assert!(manager.record("web:1", "cpu").is_none());
    }

    #[test]
    fn test_cooldown_suppression_and_expiry() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 100.0, Severity::Warning);

        clock.advance(SECOND);
        assert_eq!(
            manager.should_notify("web:1", "cpu", 100.0, 100.0),
            Decision::Suppress
        );

        clock.advance(15 * MINUTE);
        assert_eq!(
            manager.should_notify("web:1", "cpu", 100.0, 100.0),
            Decision::Notify(NotifyReason::CooldownExpired)
        );
    }

    #[test]
    fn test_cooldown_expires_exactly_at_boundary() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 110.0, Severity::Critical);

        clock.advance(5 * MINUTE - SECOND);
        assert!(!manager.should_notify("web:1", "cpu", 110.0, 100.0).should_notify());

        clock.advance(SECOND);
        assert_eq!(
            manager.should_notify("web:1", "cpu", 110.0, 100.0),
            Decision::Notify(NotifyReason::CooldownExpired)
        );
    }

    #[test]
    fn test_escalation_bypasses_cooldown() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 100.0, Severity::Warning);

        clock.advance(SECOND);
        assert_eq!(
            manager.should_notify("web:1", "cpu", 106.0, 100.0),
            Decision::Notify(NotifyReason::SeverityIncreased)
        );
        assert_eq!(
            manager.should_notify("web:1", "cpu", 120.0, 100.0),
            Decision::Notify(NotifyReason::SeverityIncreased)
        );
    }

    #[test]
    fn test_de_escalation_does_not_retrigger() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 120.0, Severity::Critical);

        clock.advance(SECOND);
        assert_eq!(
            manager.should_notify("web:1", "cpu", 101.0, 100.0),
            Decision::Suppress
        );
    }

    #[test]
    fn test_cooldown_keyed_on_recorded_severity() {
        let (mut manager, clock) = manager();
        // critical cooldown is 5 minutes even though warning's is 15
        manager.record_notification("web:1", "cpu", 120.0, Severity::Critical);
        clock.advance(5 * MINUTE + SECOND);
        assert_eq!(
            manager.should_notify("web:1", "cpu", 101.0, 100.0),
            Decision::Notify(NotifyReason::CooldownExpired)
        );
    }

    #[test]
    fn test_record_overwrites() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 101.0, Severity::Warning);
        clock.advance(MINUTE);
        manager.record_notification("web:1", "cpu", 130.0, Severity::Critical);

        let record = manager.record("web:1", "cpu").unwrap();
        assert_eq!(record.last_value, 130.0);
        assert_eq!(record.last_severity, Severity::Critical);
        assert_eq!(record.last_notified_at, clock.now());
        assert_eq!(manager.get_stats().total_entries, 1);
    }

    #[test]
    fn test_cleanup_retention_boundary() {
        let (mut manager, clock) = manager();
        manager.record_notification("old:1", "cpu", 90.0, Severity::Warning);
        clock.advance(2 * SECOND);
        manager.record_notification("new:2", "cpu", 90.0, Severity::Warning);

        // old is now max_retention + 1s old, new is max_retention - 1s old
        clock.advance(Duration::from_secs(86_400) - SECOND);
        assert_eq!(manager.cleanup_old_entries(), 1);
        assert!(manager.records_for("old:1").is_none());
        assert!(manager.record("new:2", "cpu").is_some());
    }

    #[test]
    fn test_cleanup_removes_empty_parents_only() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 90.0, Severity::Warning);
        manager.record_notification("db:2", "cpu", 90.0, Severity::Warning);
        clock.advance(Duration::from_secs(20 * 3600));
        manager.record_notification("web:1", "memory", 90.0, Severity::Warning);
        clock.advance(Duration::from_secs(5 * 3600));

        assert_eq!(manager.cleanup_old_entries(), 2);
        let stats = manager.get_stats();
        assert_eq!(stats.tracked_processes, 1);
        assert_eq!(stats.total_entries, 1);
        assert!(manager.record("web:1", "memory").is_some());
        assert!(manager.records_for("db:2").is_none());
    }

    #[test]
    fn test_cleanup_idempotent_and_empty() {
        let (mut manager, clock) = manager();
        assert_eq!(manager.cleanup_old_entries(), 0);

        manager.record_notification("web:1", "cpu", 90.0, Severity::Warning);
        manager.record_notification("web:1", "memory", 90.0, Severity::Error);
        clock.advance(Duration::from_secs(25 * 3600));
        manager.record_notification("db:2", "cpu", 90.0, Severity::Warning);

        let first = manager.cleanup_old_entries();
        let stats_after_first = manager.get_stats();
        let second = manager.cleanup_old_entries();

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(manager.get_stats(), stats_after_first);
    }

    #[test]
    fn test_purged_pair_is_first_detection_again() {
        let (mut manager, clock) = manager();
        manager.record_notification("web:1", "cpu", 120.0, Severity::Critical);
        clock.advance(Duration::from_secs(25 * 3600));
        manager.cleanup_old_entries();
        assert_eq!(
            manager.should_notify("web:1", "cpu", 101.0, 100.0),
            Decision::Notify(NotifyReason::FirstDetection)
        );
    }

    #[test]
    fn test_stats() {
        let (mut manager, _) = manager();
        manager.record_notification("web:1", "cpu", 90.0, Severity::Warning);
        manager.record_notification("web:1", "memory", 90.0, Severity::Warning);
        manager.record_notification("db:2", "cpu", 90.0, Severity::Error);

        let stats = manager.get_stats();
        assert_eq!(stats.tracked_processes, 2);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.default_cooldown, 15 * MINUTE);
        assert_eq!(stats.max_retention, Duration::from_secs(86_400));
        assert_eq!(stats.severity_cooldowns.len(), 4);

        manager.clear();
        assert_eq!(manager.get_stats().tracked_processes, 0);
    }

    #[test]
    fn test_records_for_process() {
        let (mut manager, _) = manager();
        manager.record_notification("web:1", "cpu", 90.0, Severity::Warning);
        manager.record_notification("web:1", "memory", 95.0, Severity::Error);

        let records = manager.records_for("web:1").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records["memory"].last_severity, Severity::Error);
    }
}
