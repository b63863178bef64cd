use chrono::{DateTime, Utc};
use thiserror::Error;

/// All errors generated in the tally::data module.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum DataError {
    #[error("market state has not ingested a bar yet")]
    NotInitialised,

    #[error("bar timestamp {next} does not advance the previous bar timestamp {prev}")]
    TimestampRegression {
        prev: DateTime<Utc>,
        next: DateTime<Utc>,
    },

    #[error("invalid bar at {timestamp}: {reason}")]
    InvalidBar {
        timestamp: DateTime<Utc>,
        reason: String,
    },
}
