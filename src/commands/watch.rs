//! Watch command implementation
//!
//! Reads live observations (one JSON object per line) from a monitor and
//! dispatches the alerts the policy lets through.

use crate::alerts::{Clock, Dispatcher, LogNotifier, SystemClock, TerminalNotifier};
use crate::cli::args::{OutputFormat, WatchArgs};
use crate::cli::output::{print_output, StatsView};
use crate::config::Config;
use crate::domain::Observation;
use crate::error::Result;
use crate::services::{AlertService, Outcome};
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Counters collected while watching
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    /// Alerts delivered to at least one channel
    pub notified: usize,
    /// Alerts held back by the cooldown
    pub suppressed: usize,
    /// Alerts every channel failed to deliver
    pub failed: usize,
    /// Lines that were malformed or failed validation
    pub rejected: usize,
}

/// Build the dispatcher from configuration and CLI flags
pub fn build_dispatcher(config: &Config, args: &WatchArgs) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();

    if config.notifiers.terminal {
        let mut terminal = if args.stdout {
            TerminalNotifier::stdout()
        } else {
            TerminalNotifier::new()
        };
        if !config.notifiers.color {
            terminal = terminal.without_colors();
        }
        dispatcher.add_notifier(Box::new(terminal));
    }

    if config.notifiers.log {
        dispatcher.add_notifier(Box::new(LogNotifier));
    }

    dispatcher
}

/// Execute the watch command
pub fn run_watch(args: &WatchArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let dispatcher = build_dispatcher(config, args);
    if dispatcher.notifier_count() == 0 {
        log::warn!("No notification channels enabled; alerts will only be counted");
    }

    let mut service = AlertService::new(config.to_service_config(), SystemClock, dispatcher);

    let summary = match &args.input {
        Some(path) => watch(BufReader::new(File::open(path)?), &mut service)?,
        None => watch(io::stdin().lock(), &mut service)?,
    };

    log::info!(
        "Watch finished: {} notified, {} suppressed, {} failed, {} rejected",
        summary.notified,
        summary.suppressed,
        summary.failed,
        summary.rejected
    );

    print_output(&StatsView::from(&service.stats()), format)?;
    Ok(())
}

/// Feed every observation line from `reader` into the service
///
/// Malformed or invalid observations are logged and skipped; a live monitor
/// keeps running past a bad reading.
pub fn watch<R: BufRead, C: Clock>(reader: R, service: &mut AlertService<C>) -> Result<WatchSummary> {
    let mut summary = WatchSummary::default();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let observation: Observation = match serde_json::from_str(line) {
            Ok(obs) => obs,
            Err(e) => {
                log::warn!("Skipping malformed observation: {}", e);
                summary.rejected += 1;
                continue;
            }
        };

        match service.observe(&observation) {
            Ok(Outcome::Notified(_)) => summary.notified += 1,
            Ok(Outcome::Suppressed { .. }) => summary.suppressed += 1,
            Ok(Outcome::DeliveryFailed { .. }) => summary.failed += 1,
            Ok(Outcome::BelowThreshold { .. }) => {}
            Err(e) => {
                log::warn!("Skipping observation: {}", e);
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::ManualClock;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn args() -> WatchArgs {
        WatchArgs {
            input: None,
            stdout: true,
            no_color: true,
        }
    }

    #[test]
    fn test_default_dispatcher_has_one_channel() {
        let config = Config::default();
        assert!(!config.notifiers.log);
        assert_eq!(build_dispatcher(&config, &args()).notifier_count(), 1);
    }

    #[test]
    fn test_build_dispatcher() {
        let mut config = Config::default();
        config.notifiers.log = true;
        assert_eq!(build_dispatcher(&config, &args()).notifier_count(), 2);

        config.notifiers.log = false;
        assert_eq!(build_dispatcher(&config, &args()).notifier_count(), 1);

        config.notifiers.terminal = false;
        assert_eq!(build_dispatcher(&config, &args()).notifier_count(), 0);
    }

    #[test]
    fn test_watch_counts_outcomes() {
        let config = Config::default();
        let mut service = AlertService::new(
            config.to_service_config(),
            ManualClock::default(),
            Dispatcher::new(),
        );

        let input = [
            r#"{"process_key":"web:1","resource_type":"cpu","value":85.0}"#,
            r#"{"process_key":"web:1","resource_type":"cpu","value":85.5}"#,
            r#"{"process_key":"web:1","resource_type":"cpu","value":10.0}"#,
            r#"not json"#,
            r#"{"process_key":"web:1","resource_type":"cpu","value":-1.0}"#,
            "",
            r#"{"process_key":"web:1","resource_type":"memory","value":99.0}"#,
        ]
        .join("\n");

        let summary = watch(Cursor::new(input), &mut service).unwrap();
        assert_eq!(
            summary,
            WatchSummary {
                notified: 2,
                suppressed: 1,
                failed: 0,
                rejected: 2,
            }
        );
        assert_eq!(service.stats().total_entries, 2);
    }

    #[test]
    fn test_run_watch_missing_input() {
        let args = WatchArgs {
            input: Some(PathBuf::from("/nonexistent/observations.jsonl")),
            ..args()
        };
        assert!(run_watch(&args, &Config::default(), OutputFormat::Compact).is_err());
    }
}
