//! Severity levels and threshold classification

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction of the threshold used as the severity resolution band
const BAND_FRACTION: f64 = 0.1;

/// Share of the band an excess must reach to be classified as an error
const ERROR_BAND_SHARE: f64 = 0.5;

/// Share of the band an excess must reach to be classified as critical
const CRITICAL_BAND_SHARE: f64 = 0.9;

/// Severity of a threshold exceedance
///
/// Ordered `Warning < Error < Critical`, so escalation checks are plain
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reading just over the threshold
    Warning,
    /// Reading at least half a band over the threshold
    Error,
    /// Reading at least 90% of a band over the threshold
    Critical,
}

impl Severity {
    /// Numeric rank (warning=1, error=2, critical=3)
    pub fn rank(self) -> u8 {
        match self {
            Self::Warning => 1,
            Self::Error => 2,
            Self::Critical => 3,
        }
    }

    /// Lowercase level name, as used in configuration keys
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Classify how far `value` exceeds `threshold`
///
/// The excess over the threshold is measured against a band of 10% of the
/// threshold: at least 90% of the band is critical, at least 50% is an
/// error, anything less is a warning.
///
/// Callers only classify readings that already exceed the threshold; a
/// reading below it still classifies as a warning.
pub fn classify_severity(value: f64, threshold: f64) -> Severity {
    let excess = value - threshold;
    let band = threshold * BAND_FRACTION;

    if excess >= CRITICAL_BAND_SHARE * band {
        Severity::Critical
    } else if excess >= ERROR_BAND_SHARE * band {
        Severity::Error
    } else {
        Severity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
        assert_eq!(Severity::Warning.rank(), 1);
        assert_eq!(Severity::Critical.rank(), 3);
    }

    #[test]
    fn test_boundaries_at_threshold_100() {
        assert_eq!(classify_severity(100.0, 100.0), Severity::Warning);
        assert_eq!(classify_severity(104.9, 100.0), Severity::Warning);
        assert_eq!(classify_severity(105.0, 100.0), Severity::Error);
        assert_eq!(classify_severity(108.9, 100.0), Severity::Error);
        assert_eq!(classify_severity(109.0, 100.0), Severity::Critical);
        assert_eq!(classify_severity(250.0, 100.0), Severity::Critical);
    }

    #[test]
    fn test_small_threshold() {
        // band = 8.0: error from 84.0, critical from 87.2
        assert_eq!(classify_severity(83.0, 80.0), Severity::Warning);
        assert_eq!(classify_severity(84.5, 80.0), Severity::Error);
        assert_eq!(classify_severity(88.0, 80.0), Severity::Critical);
    }

    #[test]
    fn test_below_threshold_is_warning() {
        assert_eq!(classify_severity(10.0, 100.0), Severity::Warning);
    }

    #[test]
    fn test_monotonic_in_value() {
        let threshold = 75.0;
        let mut previous = classify_severity(threshold, threshold);
        let mut value = threshold;
        while value < threshold * 1.5 {
            let current = classify_severity(value, threshold);
            assert!(current >= previous, "severity dropped at {}", value);
            previous = current;
            value += 0.01;
        }
        assert_eq!(previous, Severity::Critical);
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" error ".parse::<Severity>().unwrap(), Severity::Error);
        assert!(matches!(
            "info".parse::<Severity>(),
            Err(DomainError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn test_display_and_as_str() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Error.as_str(), "error");
    }
}
