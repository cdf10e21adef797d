//! Alert and notification system
//!
//! Provides the notification de-duplication and escalation policy together
//! with the channels that deliver the alerts it lets through.

mod clock;
mod config;
mod manager;
mod notifier;
mod shared;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{NotificationSettings, COOLDOWN_LEVELS};
pub use manager::{NotificationManager, PolicyConfig};
pub use notifier::{Dispatcher, LogNotifier, Notifier, TerminalNotifier};
pub use shared::SharedNotificationManager;
pub use types::{AlertEvent, Decision, NotificationRecord, NotificationStats, NotifyReason};
