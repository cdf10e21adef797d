//! healwatch - alert de-duplication and escalation library
//!
//! This library provides the notification policy of a self-healing
//! monitoring stack: for every monitored (process, resource) pair it decides
//! whether a threshold breach should produce a new alert, letting
//! escalations through immediately and holding repeats back for a
//! per-severity cooldown.
//!
//! # Modules
//!
//! - [`alerts`]: Notification policy, clocks and delivery channels
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Severity scale and observations
//! - [`error`]: Error types
//! - [`services`]: Monitor-side alert workflow

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

pub use error::{AppError, Result};
