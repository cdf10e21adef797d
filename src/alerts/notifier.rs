//! Alert notification channels
//!
//! Delivers alert events to the terminal and the log. Webhook and chat
//! integrations plug in through the same [`Notifier`] trait.

use super::types::AlertEvent;
use crate::domain::Severity;
use crate::error::{AppError, Result};
use std::io::{self, Write};
use std::time::UNIX_EPOCH;

/// Notification channel trait
pub trait Notifier: Send + Sync {
    /// Send a notification for an alert
    fn notify(&self, event: &AlertEvent) -> Result<()>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Terminal/console notifier
///
/// Outputs alerts to stdout/stderr with colored formatting
pub struct TerminalNotifier {
    /// Use stderr instead of stdout
    use_stderr: bool,
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalNotifier {
    /// Create a new terminal notifier
    pub fn new() -> Self {
        Self {
            use_stderr: true,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier that uses stdout
    pub fn stdout() -> Self {
        Self {
            use_stderr: false,
            use_colors: Self::supports_color(),
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Check if terminal supports colors
    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
            && std::env::var_os("NO_COLOR").is_none()
    }

    /// Format an alert line
    fn format_event(&self, event: &AlertEvent) -> String {
        let timestamp = event
            .timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| {
                let secs = d.as_secs();
                let hours = (secs / 3600) % 24;
                let mins = (secs % 3600) / 60;
                let secs = secs % 60;
                format!("{:02}:{:02}:{:02}", hours, mins, secs)
            })
            .unwrap_or_else(|_| "??:??:??".to_string());

        format!(
            "[{}] {} {}",
            timestamp,
            self.format_severity(event.severity),
            event.message
        )
    }

    /// Format severity with colors
    fn format_severity(&self, severity: Severity) -> String {
        if !self.use_colors {
            return format!("{}", severity);
        }

        let color_code = match severity {
            Severity::Warning => "\x1b[33m",         // Yellow
            Severity::Error => "\x1b[31m",           // Red
            Severity::Critical => "\x1b[35m\x1b[1m", // Bold Magenta
        };

        format!("{}{}\x1b[0m", color_code, severity)
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<()> {
        let message = self.format_event(event);

        if self.use_stderr {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            writeln!(handle, "{}", message)?;
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", message)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Log notifier
///
/// Emits alerts through the `log` facade: warnings at `warn`, errors and
/// critical alerts at `error`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<()> {
        match event.severity {
            Severity::Warning => log::warn!("[{}] {}", event.severity, event.message),
            Severity::Error | Severity::Critical => {
                log::error!("[{}] {}", event.severity, event.message)
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Alert dispatcher
///
/// Fans alerts out to every registered channel.
#[derive(Default)]
pub struct Dispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create a dispatcher with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notifier
    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Builder form of [`Dispatcher::add_notifier`]
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.add_notifier(notifier);
        self
    }

    /// Send an alert to all channels
    ///
    /// Returns how many channels delivered it. Fails only when channels are
    /// registered and every one of them failed.
    pub fn dispatch(&self, event: &AlertEvent) -> Result<usize> {
        let mut delivered = 0;
        let mut failures = Vec::new();

        for notifier in &self.notifiers {
            match notifier.notify(event) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    log::warn!("Failed to notify via {}: {}", notifier.name(), e);
                    failures.push(format!("{}: {}", notifier.name(), e));
                }
            }
        }

        if delivered == 0 && !failures.is_empty() {
            return Err(AppError::Delivery(failures.join("; ")));
        }
        Ok(delivered)
    }

    /// Get number of registered notifiers
    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }
}
