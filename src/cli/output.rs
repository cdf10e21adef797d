//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::alerts::NotificationStats;
use crate::cli::args::OutputFormat;
use crate::domain::Severity;
use crate::services::Outcome;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Render a duration as hours/minutes/seconds, e.g. "1h 30m"
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    if total == 0 {
        return "0s".to_string();
    }

    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

/// Classification result for display
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub value: f64,
    pub threshold: f64,
    pub exceeded: bool,
    pub excess: f64,
    pub band: f64,
    pub severity: Severity,
}

impl TableDisplay for Classification {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Reading {:.2} against threshold {:.2}\n",
            self.value, self.threshold
        );
        output.push_str(&format!(
            "Excess: {:.2} (band {:.2})\n",
            self.excess, self.band
        ));
        output.push_str(&format!("Severity: {}", self.severity));
        if !self.exceeded {
            output.push_str("\nNote: threshold not exceeded, monitors would not alert");
        }
        output
    }

    fn to_compact(&self) -> String {
        format!("{:.2}/{:.2}:{}", self.value, self.threshold, self.severity.as_str())
    }
}

/// Notification statistics for display
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub tracked_processes: usize,
    pub total_entries: usize,
    pub max_retention_secs: u64,
    pub default_cooldown_secs: u64,
    pub severity_cooldowns_secs: BTreeMap<String, u64>,
}

impl From<&NotificationStats> for StatsView {
    fn from(stats: &NotificationStats) -> Self {
        Self {
            tracked_processes: stats.tracked_processes,
            total_entries: stats.total_entries,
            max_retention_secs: stats.max_retention.as_secs(),
            default_cooldown_secs: stats.default_cooldown.as_secs(),
            severity_cooldowns_secs: stats
                .severity_cooldowns
                .iter()
                .map(|(level, cooldown)| (level.clone(), cooldown.as_secs()))
                .collect(),
        }
    }
}

impl TableDisplay for StatsView {
    fn to_table(&self) -> String {
        let mut output = format!("Tracked processes: {}\n", self.tracked_processes);
        output.push_str(&format!("Total entries: {}\n", self.total_entries));
        output.push_str(&format!(
            "Retention: {}\n",
            format_duration(Duration::from_secs(self.max_retention_secs))
        ));
        output.push_str(&format!(
            "Default cooldown: {}\n",
            format_duration(Duration::from_secs(self.default_cooldown_secs))
        ));
        output.push_str("Severity cooldowns:");
        for (level, secs) in &self.severity_cooldowns_secs {
            output.push_str(&format!(
                "\n  {:<9} {}",
                level,
                format_duration(Duration::from_secs(*secs))
            ));
        }
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "processes={} entries={}",
            self.tracked_processes, self.total_entries
        )
    }
}

/// One replayed observation
#[derive(Debug, Clone, Serialize)]
pub struct ReplayLine {
    pub elapsed_secs: u64,
    pub process_key: String,
    pub resource_type: String,
    pub value: f64,
    pub outcome: Outcome,
}

impl ReplayLine {
    fn status(&self) -> String {
        match &self.outcome {
            Outcome::BelowThreshold { threshold } => format!("ok (< {:.2})", threshold),
            Outcome::Suppressed { severity, .. } => format!("{} suppressed", severity),
            Outcome::Notified(event) => format!("{} notify ({})", event.severity, event.reason),
            Outcome::DeliveryFailed { event, error } => {
                format!("{} delivery failed: {}", event.severity, error)
            }
        }
    }
}

impl TableDisplay for ReplayLine {
    fn to_table(&self) -> String {
        format!(
            "[+{:>8}] {} {} {:.2}: {}",
            format_duration(Duration::from_secs(self.elapsed_secs)),
            self.process_key,
            self.resource_type,
            self.value,
            self.status()
        )
    }
}

/// Replay report for display
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub observations: Vec<ReplayLine>,
    pub notified: usize,
    pub suppressed: usize,
    pub below_threshold: usize,
    pub cleaned_up: usize,
    pub stats: StatsView,
}

impl TableDisplay for ReplayReport {
    fn to_table(&self) -> String {
        let mut output = String::new();
        for line in &self.observations {
            output.push_str(&line.to_table());
            output.push('\n');
        }
        if !self.observations.is_empty() {
            output.push_str(&format!("{:-<60}\n", ""));
        }
        output.push_str(&format!(
            "Notified: {}, suppressed: {}, below threshold: {}, purged: {}\n\n",
            self.notified, self.suppressed, self.below_threshold, self.cleaned_up
        ));
        output.push_str(&self.stats.to_table());
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "notified={} suppressed={} below={} {}",
            self.notified,
            self.suppressed,
            self.below_threshold,
            self.stats.to_compact()
        )
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
