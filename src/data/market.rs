use crate::data::error::DataError;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifies one scalar field of a [`Bar`]. Downstream components key per-field history with
/// this enum rather than stringly-typed lookups.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MarketField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl MarketField {
    /// Every [`MarketField`] in [`Bar`] layout order.
    pub const ALL: [MarketField; 5] = [
        MarketField::Open,
        MarketField::High,
        MarketField::Low,
        MarketField::Close,
        MarketField::Volume,
    ];
}

/// A time-bucketed OHLCV quote. The canonical market event consumed by the
/// [`BacktestEngine`](crate::engine::BacktestEngine) - one [`Bar`] drives one engine step.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Constructs a new [`Bar`], validating the OHLC ordering invariant and non-negative volume.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, DataError> {
        let bar = Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Checks `low <= min(open, close) <= max(open, close) <= high` and `volume >= 0`. NaN in any
    /// field fails both comparisons.
    pub fn validate(&self) -> Result<(), DataError> {
        if !(self.volume >= 0.0) {
            return Err(DataError::InvalidBar {
                timestamp: self.timestamp,
                reason: format!("volume must be non-negative, got {}", self.volume),
            });
        }

        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if !(self.low <= body_low && body_high <= self.high) {
            return Err(DataError::InvalidBar {
                timestamp: self.timestamp,
                reason: format!(
                    "OHLC ordering violated: open={} high={} low={} close={}",
                    self.open, self.high, self.low, self.close
                ),
            });
        }

        Ok(())
    }

    /// Returns the value of the provided [`MarketField`].
    pub fn field(&self, field: MarketField) -> f64 {
        match field {
            MarketField::Open => self.open,
            MarketField::High => self.high,
            MarketField::Low => self.low,
            MarketField::Close => self.close,
            MarketField::Volume => self.volume,
        }
    }
}
