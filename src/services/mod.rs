//! Service layer
//!
//! Services encapsulate the monitor-side workflow around the notification
//! policy.

pub mod alert_service;

pub use alert_service::{AlertService, AlertServiceConfig, Outcome};
