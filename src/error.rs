//! Error types
//!
//! The simulation itself never fails: bad inputs are clamped. The only
//! rejectable input is a wave tuning that would break the math.

use std::fmt;

/// Errors produced when loading or validating a [`WaveTuning`](crate::WaveTuning).
#[derive(Debug)]
pub enum TuningError {
    /// A field that must be strictly positive was zero or negative.
    NonPositive { field: &'static str, value: f64 },
    /// A field that must not be negative was below zero.
    Negative { field: &'static str, value: f64 },
    /// A field was positive but under its usable minimum.
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },
    /// A field was NaN or infinite.
    NonFinite { field: &'static str },
    /// `max_impulses` was set to zero, which would reject every impulse.
    ZeroCapacity,
    /// The tuning JSON could not be parsed.
    Parse(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NonPositive { field, value } => {
                write!(f, "Tuning field `{}` must be positive, got {}", field, value)
            }
            TuningError::Negative { field, value } => {
                write!(f, "Tuning field `{}` must not be negative, got {}", field, value)
            }
            TuningError::BelowMinimum { field, value, min } => {
                write!(f, "Tuning field `{}` must be at least {}, got {}", field, min, value)
            }
            TuningError::NonFinite { field } => {
                write!(f, "Tuning field `{}` must be a finite number", field)
            }
            TuningError::ZeroCapacity => write!(f, "max_impulses must be at least 1"),
            TuningError::Parse(e) => write!(f, "Failed to parse tuning: {}", e),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}
