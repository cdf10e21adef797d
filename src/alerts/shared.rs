//! Thread-safe handle to a notification manager
//!
//! Several monitor threads may observe overlapping process sets. Each
//! decide-deliver-record sequence runs under one lock, so two callers can
//! never both see `first_detection` for the same pair and double-notify.

use super::clock::{Clock, SystemClock};
use super::manager::{NotificationManager, PolicyConfig};
use super::types::{Decision, NotificationStats};
use crate::domain::{classify_severity, Severity};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-guarded notification manager
pub struct SharedNotificationManager<C: Clock = SystemClock> {
    inner: Arc<Mutex<NotificationManager<C>>>,
}

impl<C: Clock> Clone for SharedNotificationManager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedNotificationManager<SystemClock> {
    /// Create a shared manager on the wall clock
    pub fn new(config: PolicyConfig) -> Self {
        Self::from_manager(NotificationManager::new(config))
    }
}

impl<C: Clock> SharedNotificationManager<C> {
    /// Wrap an existing manager
    pub fn from_manager(manager: NotificationManager<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    // History is plain data and every mutation completes before the guard
    // drops, so a poisoned lock still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, NotificationManager<C>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Decide, deliver and record as one transaction
    ///
    /// `deliver` is called only for a positive decision, with the decision
    /// and the classified severity, while the lock is held. The notification
    /// is recorded only if `deliver` returns `true`, so a failed delivery is
    /// retried on the next observation.
    pub fn evaluate<F>(
        &self,
        process_key: &str,
        resource_type: &str,
        current_value: f64,
        threshold: f64,
        deliver: F,
    ) -> Decision
    where
        F: FnOnce(Decision, Severity) -> bool,
    {
        let mut manager = self.lock();
        let decision = manager.should_notify(process_key, resource_type, current_value, threshold);
        if !decision.should_notify() {
            return decision;
        }

        let severity = classify_severity(current_value, threshold);
        if deliver(decision, severity) {
            manager.record_notification(process_key, resource_type, current_value, severity);
        } else {
            log::warn!(
                "Delivery failed for {}/{}, not recording",
                process_key,
                resource_type
            );
        }
        decision
    }

    /// See [`NotificationManager::should_notify`]
    pub fn should_notify(
        &self,
        process_key: &str,
        resource_type: &str,
        current_value: f64,
        threshold: f64,
    ) -> Decision {
        self.lock()
            .should_notify(process_key, resource_type, current_value, threshold)
    }

    /// See [`NotificationManager::record_notification`]
    pub fn record_notification(
        &self,
        process_key: &str,
        resource_type: &str,
        value: f64,
        severity: Severity,
    ) {
        self.lock()
            .record_notification(process_key, resource_type, value, severity);
    }

    /// See [`NotificationManager::cleanup_old_entries`]
    pub fn cleanup_old_entries(&self) -> usize {
        self.lock().cleanup_old_entries()
    }

    /// See [`NotificationManager::get_stats`]
    pub fn get_stats(&self) -> NotificationStats {
        self.lock().get_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{ManualClock, NotifyReason};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn shared() -> (SharedNotificationManager<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let manager = NotificationManager::with_clock(PolicyConfig::default(), clock.clone());
        (SharedNotificationManager::from_manager(manager), clock)
    }

    #[test]
    fn test_evaluate_records_on_delivery() {
        let (shared, _) = shared();
        let decision = shared.evaluate("web:1", "cpu", 110.0, 100.0, |decision, severity| {
            assert_eq!(decision, Decision::Notify(NotifyReason::FirstDetection));
            assert_eq!(severity, Severity::Critical);
            true
        });
        assert!(decision.should_notify());
        assert_eq!(shared.get_stats().total_entries, 1);

        let again = shared.evaluate("web:1", "cpu", 110.0, 100.0, |_, _| {
            panic!("suppressed decisions must not deliver")
        });
        assert_eq!(again, Decision::Suppress);
    }

    #[test]
    fn test_evaluate_skips_record_on_failed_delivery() {
        let (shared, _) = shared();
        shared.evaluate("web:1", "cpu", 110.0, 100.0, |_, _| false);
        assert_eq!(shared.get_stats().total_entries, 0);

        // Retried on the next poll
        assert_eq!(
            shared.should_notify("web:1", "cpu", 110.0, 100.0),
            Decision::Notify(NotifyReason::FirstDetection)
        );
    }

    #[test]
    fn test_concurrent_callers_notify_once() {
        let (shared, _) = shared();
        let delivered = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                let delivered = Arc::clone(&delivered);
                thread::spawn(move || {
                    shared.evaluate("web:1", "cpu", 101.0, 100.0, |_, _| {
                        delivered.fetch_add(1, Ordering::SeqCst);
                        true
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cleanup_through_handle() {
        let (shared, clock) = shared();
        shared.record_notification("web:1", "cpu", 101.0, Severity::Warning);
        clock.advance(Duration::from_secs(24 * 3600 + 1));
        assert_eq!(shared.cleanup_old_entries(), 1);
        assert_eq!(shared.get_stats().tracked_processes, 0);
    }
}
