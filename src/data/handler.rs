use crate::data::error::DataError;
use crate::data::market::Bar;

/// Generates the next canonical [`Bar`], acting as the system heartbeat.
pub trait MarketFeed {
    /// Return the next [`Bar`], or None once the feed is exhausted.
    fn next_bar(&mut self) -> Option<Bar>;
}

/// [`Bar`] feed that drip feeds a historical dataset. The full dataset is validated up front:
/// every bar must satisfy the OHLC invariant and timestamps must strictly increase.
#[derive(Clone, Debug)]
pub struct HistoricalBarFeed {
    bars: std::vec::IntoIter<Bar>,
}

impl HistoricalBarFeed {
    /// Constructs a new [`HistoricalBarFeed`] after validating the provided dataset.
    pub fn new(bars: Vec<Bar>) -> Result<Self, DataError> {
        for bar in &bars {
            bar.validate()?;
        }

        for window in bars.windows(2) {
            if window[1].timestamp <= window[0].timestamp {
                return Err(DataError::TimestampRegression {
                    prev: window[0].timestamp,
                    next: window[1].timestamp,
                });
            }
        }

        Ok(Self {
            bars: bars.into_iter(),
        })
    }
}

impl MarketFeed for HistoricalBarFeed {
    fn next_bar(&mut self) -> Option<Bar> {
        self.bars.next()
    }
}

impl Iterator for HistoricalBarFeed {
    type Item = Bar;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_bar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

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
    fn should_yield_bars_in_order_until_exhausted() {
        let mut feed = HistoricalBarFeed::new(vec![bar(0, 10.0), bar(1, 11.0)]).unwrap();

        assert_eq!(feed.next_bar().unwrap().close, 10.0);
        assert_eq!(feed.next_bar().unwrap().close, 11.0);
        assert_eq!(feed.next_bar(), None);
    }

    #[test]
    fn should_return_err_with_non_monotone_dataset() {
        let actual = HistoricalBarFeed::new(vec![bar(1, 10.0), bar(0, 11.0)]);
        assert!(matches!(
            actual,
            Err(DataError::TimestampRegression { .. })
        ));
    }

    #[test]
    fn should_return_err_with_ohlc_invalid_dataset() {
        let mut broken = bar(0, 10.0);
        broken.high = broken.low - 1.0;

        let actual = HistoricalBarFeed::new(vec![broken]);
        assert!(matches!(actual, Err(DataError::InvalidBar { .. })));
    }
}
