use crate::data::error::DataError;
use crate::data::market::{Bar, MarketField};
use chrono::{DateTime, Utc};

/// Append-only per-field history of every ingested [`Bar`], in ingestion order.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FieldHistory {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl FieldHistory {
    fn push(&mut self, bar: &Bar) {
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.volume.push(bar.volume);
    }

    /// Returns the full history of the provided [`MarketField`] in ingestion order.
    pub fn field(&self, field: MarketField) -> &[f64] {
        match field {
            MarketField::Open => &self.open,
            MarketField::High => &self.high,
            MarketField::Low => &self.low,
            MarketField::Close => &self.close,
            MarketField::Volume => &self.volume,
        }
    }

    /// Number of [`Bar`]s ingested so far.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Maintains the latest [`Bar`] snapshot and the per-field rolling [`FieldHistory`]. Ingestion is
/// strictly monotone in timestamp; a bar that fails to advance the clock is rejected.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MarketState {
    snapshot: Option<Bar>,
    history: FieldHistory,
}

impl MarketState {
    /// Constructs a new empty [`MarketState`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests the next [`Bar`], updating the snapshot and per-field history.
    pub fn ingest(&mut self, bar: Bar) -> Result<(), DataError> {
        if let Some(prev) = &self.snapshot {
            if bar.timestamp <= prev.timestamp {
                return Err(DataError::TimestampRegression {
                    prev: prev.timestamp,
                    next: bar.timestamp,
                });
            }
        }

        self.history.push(&bar);
        self.snapshot = Some(bar);
        Ok(())
    }

    /// Returns a read-only [`MarketView`] of the current snapshot and history.
    pub fn view(&self) -> Result<MarketView<'_>, DataError> {
        self.snapshot
            .as_ref()
            .map(|snapshot| MarketView {
                snapshot,
                history: &self.history,
            })
            .ok_or(DataError::NotInitialised)
    }
}

/// Read-only snapshot of the latest [`Bar`] plus per-field history, handed to the feature
/// pipelines, strategy, filters and planner each step.
#[derive(Copy, Clone, Debug)]
pub struct MarketView<'a> {
    snapshot: &'a Bar,
    history: &'a FieldHistory,
}

impl<'a> MarketView<'a> {
    /// Timestamp of the latest ingested [`Bar`].
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.snapshot.timestamp
    }

    /// The latest ingested [`Bar`].
    pub fn bar(&self) -> &'a Bar {
        self.snapshot
    }

    /// Full history of the provided [`MarketField`] in ingestion order, latest last.
    pub fn history(&self, field: MarketField) -> &'a [f64] {
        self.history.field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(minute: u32, close: f64) -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
            close,
            close,
            close,
            close,
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn should_return_err_when_view_requested_before_first_ingest() {
        let state = MarketState::new();
        assert_eq!(state.view().err(), Some(DataError::NotInitialised));
    }

    #[test]
    fn should_accumulate_per_field_history_in_ingestion_order() {
        let mut state = MarketState::new();
        state.ingest(bar(0, 10.0)).unwrap();
        state.ingest(bar(1, 11.0)).unwrap();
        state.ingest(bar(2, 12.0)).unwrap();

        let view = state.view().unwrap();
        assert_eq!(view.history(MarketField::Close), &[10.0, 11.0, 12.0]);
        assert_eq!(view.bar().close, 12.0);
    }

    #[test]
    fn should_return_err_when_timestamp_regresses() {
        let mut state = MarketState::new();
        state.ingest(bar(1, 10.0)).unwrap();

        let actual = state.ingest(bar(0, 11.0));
        assert!(matches!(
            actual,
            Err(DataError::TimestampRegression { .. })
        ));
    }

    #[test]
    fn should_return_err_when_timestamp_is_duplicated() {
        let mut state = MarketState::new();
        state.ingest(bar(1, 10.0)).unwrap();

        let actual = state.ingest(bar(1, 11.0));
        assert!(matches!(
            actual,
            Err(DataError::TimestampRegression { .. })
        ));
    }
}
