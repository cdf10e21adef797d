//! Replay command implementation
//!
//! Feeds recorded, timestamped observations through the notification policy
//! on a manual clock, so hours of monitoring history replay instantly.

use crate::alerts::{Clock, Dispatcher, ManualClock};
use crate::cli::args::{OutputFormat, ReplayArgs};
use crate::cli::output::{print_output, ReplayLine, ReplayReport, StatsView};
use crate::config::Config;
use crate::domain::Observation;
use crate::error::{AppError, DomainError, Result};
use crate::services::{AlertService, Outcome};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::{Duration, UNIX_EPOCH};

/// One line of a replay file
#[derive(Debug, Clone, Deserialize)]
struct ReplayRecord {
    /// Seconds since the start of the recording
    elapsed_secs: u64,
    process_key: String,
    resource_type: String,
    value: f64,
    #[serde(default)]
    threshold: Option<f64>,
}

/// Execute the replay command
pub fn run_replay(args: &ReplayArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let file = File::open(&args.file).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", args.file.display(), e),
        ))
    })?;

    let mut report = replay(BufReader::new(file), config)?;
    if args.quiet {
        report.observations.retain(|line| line.outcome.is_notified());
    }

    print_output(&report, format)?;
    Ok(())
}

/// Replay JSON-lines observations and collect every outcome
///
/// Blank lines and lines starting with `#` are skipped. Timestamps must not
/// go backwards.
pub fn replay<R: BufRead>(reader: R, config: &Config) -> Result<ReplayReport> {
    let clock = ManualClock::new(UNIX_EPOCH);
    let mut service = AlertService::new(config.to_service_config(), clock.clone(), Dispatcher::new());

    let mut observations = Vec::new();
    let mut last_elapsed = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record: ReplayRecord = serde_json::from_str(line).map_err(|e| {
            DomainError::InvalidObservation(format!("line {}: {}", idx + 1, e))
        })?;

        if record.elapsed_secs < last_elapsed {
            return Err(DomainError::InvalidObservation(format!(
                "line {}: elapsed_secs {} is earlier than {}",
                idx + 1,
                record.elapsed_secs,
                last_elapsed
            ))
            .into());
        }
        last_elapsed = record.elapsed_secs;
        clock.set(UNIX_EPOCH + Duration::from_secs(record.elapsed_secs));

        let observation = Observation {
            process_key: record.process_key,
            resource_type: record.resource_type,
            value: record.value,
            threshold: record.threshold,
        };
        let outcome = service.observe(&observation).map_err(|e| match e {
            AppError::Domain(err) => {
                DomainError::InvalidObservation(format!("line {}: {}", idx + 1, err)).into()
            }
            other => other,
        })?;

        log::debug!(
            "t+{}s {}/{}: {:?}",
            record.elapsed_secs,
            observation.process_key,
            observation.resource_type,
            outcome
        );

        observations.push(ReplayLine {
            elapsed_secs: record.elapsed_secs,
            process_key: observation.process_key,
            resource_type: observation.resource_type,
            value: observation.value,
            outcome,
        });
    }

    let count = |pred: fn(&Outcome) -> bool| observations.iter().filter(|l| pred(&l.outcome)).count();
    let notified = count(|o| matches!(o, Outcome::Notified(_)));
    let suppressed = count(|o| matches!(o, Outcome::Suppressed { .. }));
    let below_threshold = count(|o| matches!(o, Outcome::BelowThreshold { .. }));

    log::info!(
        "Replayed {} observation(s) up to t+{}s",
        observations.len(),
        clock.now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
    );

    Ok(ReplayReport {
        observations,
        notified,
        suppressed,
        below_threshold,
        cleaned_up: service.purged_total(),
        stats: StatsView::from(&service.stats()),
    })
}
