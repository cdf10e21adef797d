//! Classify command implementation

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Classification};
use crate::domain::{classify_severity, validate_threshold};
use crate::error::{DomainError, Result};

/// Build the classification of a single reading
pub fn classification(value: f64, threshold: f64) -> Result<Classification> {
    validate_threshold(threshold)?;
    if !value.is_finite() {
        return Err(DomainError::InvalidValue(value).into());
    }

    Ok(Classification {
        value,
        threshold,
        exceeded: value >= threshold,
        excess: value - threshold,
        band: threshold * 0.1,
        severity: classify_severity(value, threshold),
    })
}

/// Execute the classify command
pub fn run_classify(value: f64, threshold: f64, format: OutputFormat) -> Result<()> {
    let result = classification(value, threshold)?;
    print_output(&result, format)?;
    Ok(())
}
