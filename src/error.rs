use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::schema::Sport;

/// One unit of raw input handed over by the fetcher: a season archive page or a
/// single scrape date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum UnitKey {
    Season(i32),
    Date(NaiveDate),
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKey::Season(year) => write!(f, "season {year}"),
            UnitKey::Date(date) => write!(f, "date {}", date.format("%Y-%m-%d")),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{unit}: no parseable table")]
    MissingData { unit: UnitKey },
    #[error("{unit}: unavailable ({reason})")]
    Unavailable { unit: UnitKey, reason: String },
    #[error("{unit}: row {row} has {width} cells, column {column} out of range")]
    Structural {
        unit: UnitKey,
        row: usize,
        column: usize,
        width: usize,
    },
    #[error("{unit}: row {row} has invalid date {raw:?}")]
    InvalidDate {
        unit: UnitKey,
        row: usize,
        raw: String,
    },
    #[error("{unit}: no column mapped for {field}")]
    Unmapped { unit: UnitKey, field: String },
    #[error("{unit}: {sport} expects {expected} units")]
    UnitMismatch {
        unit: UnitKey,
        sport: Sport,
        expected: &'static str,
    },
}

impl EngineError {
    pub fn unit(&self) -> UnitKey {
        match self {
            EngineError::MissingData { unit }
            | EngineError::Unavailable { unit, .. }
            | EngineError::Structural { unit, .. }
            | EngineError::InvalidDate { unit, .. }
            | EngineError::Unmapped { unit, .. }
            | EngineError::UnitMismatch { unit, .. } => *unit,
        }
    }

    /// Schema/input mismatch, as opposed to data that simply is not there.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            EngineError::MissingData { .. } | EngineError::Unavailable { .. }
        )
    }
}
