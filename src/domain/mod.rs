//! Domain models for healwatch
//!
//! This module contains the severity scale and the observation type fed
//! into the notification policy. Types are validated on construction or
//! before use (fail-fast pattern).

pub mod observation;
pub mod severity;

pub use observation::{validate_threshold, Observation};
pub use severity::{classify_severity, Severity};
