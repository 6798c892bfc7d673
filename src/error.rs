//! Engine error type.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    /// Caller asked for a window whose start lies after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Event Store failed or returned rows the engine cannot use.
    #[error("event data unavailable: {0}")]
    DataUnavailable(#[source] anyhow::Error),
}

impl ScoreError {
    pub fn data(err: impl Into<anyhow::Error>) -> Self {
        ScoreError::DataUnavailable(err.into())
    }
}

pub type ScoreResult<T> = Result<T, ScoreError>;
