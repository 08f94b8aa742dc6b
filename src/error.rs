// File: ./src/error.rs
//! Rejection kinds for waiver operations.
//!
//! Every variant is recoverable: the operation that produced it left the
//! store untouched and the caller decides whether to report and retry.

/// Failure of a waiver add/delete/import step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaiverError {
    /// A date string did not parse as a real `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// A time string did not parse as `HH:MM` (24h).
    InvalidTime(String),
    /// The end date lies before the start date.
    InvertedRange { start: String, end: String },
    /// The key already exists or the range intersects stored waivers.
    DuplicateOrOverlap { key: String, conflicts: Vec<String> },
    /// No day of the range is a working day.
    NoWorkingDayInRange { key: String },
    /// The backing store failed or refused the operation.
    StoreUnavailable(String),
}

impl WaiverError {
    /// Short machine-friendly name of the kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WaiverError::InvalidDate(_) => "InvalidDate",
            WaiverError::InvalidTime(_) => "InvalidTime",
            WaiverError::InvertedRange { .. } => "InvertedRange",
            WaiverError::DuplicateOrOverlap { .. } => "DuplicateOrOverlap",
            WaiverError::NoWorkingDayInRange { .. } => "NoWorkingDayInRange",
            WaiverError::StoreUnavailable(_) => "StoreUnavailable",
        }
    }
}

impl std::fmt::Display for WaiverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaiverError::InvalidDate(s) => write!(f, "Invalid date: '{}'", s),
            WaiverError::InvalidTime(s) => write!(f, "Invalid time: '{}' (expected HH:MM)", s),
            WaiverError::InvertedRange { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            WaiverError::DuplicateOrOverlap { key, conflicts } => {
                if conflicts.is_empty() {
                    write!(f, "Waiver {} already exists", key)
                } else {
                    write!(f, "Waiver {} overlaps {}", key, conflicts.join(", "))
                }
            }
            WaiverError::NoWorkingDayInRange { key } => {
                write!(f, "Waiver {} does not contain any working day", key)
            }
            WaiverError::StoreUnavailable(s) => write!(f, "Waiver store unavailable: {}", s),
        }
    }
}

impl std::error::Error for WaiverError {}

impl From<anyhow::Error> for WaiverError {
    fn from(e: anyhow::Error) -> Self {
        Self::StoreUnavailable(format!("{:#}", e))
    }
}
