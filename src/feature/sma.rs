use crate::data::state::MarketView;
use crate::feature::error::FeatureError;
use crate::feature::store::FeatureValues;
use crate::feature::FeaturePipeline;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use ta::indicators::SimpleMovingAverage;
use ta::{Next, Reset};

/// Configuration for constructing a [`SmaCrossPipeline`] via the new() constructor method.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Config {
    pub fast_window: usize,
    pub slow_window: usize,
}

/// Feature pipeline producing fast & slow simple moving averages of the close price.
///
/// Writes `ma_fast` & `ma_slow` into the store and reports readiness once the slow window has
/// filled with observations.
#[derive(Debug)]
pub struct SmaCrossPipeline {
    fast: SimpleMovingAverage,
    slow: SimpleMovingAverage,
    slow_window: usize,
    observations: usize,
}

impl SmaCrossPipeline {
    pub const NAME: &'static str = "sma_cross";
    pub const MA_FAST: &'static str = "ma_fast";
    pub const MA_SLOW: &'static str = "ma_slow";

    /// Constructs a new [`SmaCrossPipeline`] component using the provided [`Config`].
    pub fn new(config: Config) -> Result<Self, FeatureError> {
        if config.fast_window == 0 || config.slow_window == 0 {
            return Err(FeatureError::Configuration(String::from(
                "fast_window and slow_window must be positive",
            )));
        }
        if config.fast_window >= config.slow_window {
            return Err(FeatureError::Configuration(String::from(
                "fast_window must be < slow_window",
            )));
        }

        let fast = SimpleMovingAverage::new(config.fast_window).map_err(|error| {
            FeatureError::Configuration(format!(
                "invalid fast window {}: {:?}",
                config.fast_window, error
            ))
        })?;
        let slow = SimpleMovingAverage::new(config.slow_window).map_err(|error| {
            FeatureError::Configuration(format!(
                "invalid slow window {}: {:?}",
                config.slow_window, error
            ))
        })?;

        Ok(Self {
            fast,
            slow,
            slow_window: config.slow_window,
            observations: 0,
        })
    }
}

impl FeaturePipeline for SmaCrossPipeline {
    fn name(&self) -> SmolStr {
        SmolStr::new_static(Self::NAME)
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.observations = 0;
    }

    fn update(
        &mut self,
        market: &MarketView<'_>,
        values: &mut FeatureValues,
    ) -> Result<(), FeatureError> {
        let close = market.bar().close;
        let ma_fast = self.fast.next(close);
        let ma_slow = self.slow.next(close);
        self.observations += 1;

        // Both averages are only formed once the slow window has filled
        if self.observations < self.slow_window {
            return Ok(());
        }

        values.set_value(Self::MA_FAST, ma_fast);
        values.set_value(Self::MA_SLOW, ma_slow);
        values.set_pipeline_ready(Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market::Bar;
    use crate::data::state::MarketState;
    use crate::feature::store::FeatureStore;
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

    fn store() -> FeatureStore {
        FeatureStore::new(vec![Box::new(
            SmaCrossPipeline::new(Config {
                fast_window: 2,
                slow_window: 3,
            })
            .unwrap(),
        )])
        .unwrap()
    }

    #[test]
    fn should_return_err_with_fast_window_not_below_slow_window() {
        let actual = SmaCrossPipeline::new(Config {
            fast_window: 3,
            slow_window: 3,
        });
        assert!(matches!(actual, Err(FeatureError::Configuration(_))));
    }

    #[test]
    fn should_not_be_ready_before_slow_window_fills() {
        let mut store = store();
        let mut market = MarketState::new();

        for (minute, close) in [(0, 10.0), (1, 11.0)] {
            market.ingest(bar(minute, close)).unwrap();
            store.ingest(&market.view().unwrap()).unwrap();
        }

        let view = store.view();
        assert!(!view.pipeline_is_ready(SmaCrossPipeline::NAME));
        assert_eq!(view.get(SmaCrossPipeline::MA_FAST), None);
        assert_eq!(view.get(SmaCrossPipeline::MA_SLOW), None);
    }

    #[test]
    fn should_write_both_averages_once_slow_window_fills() {
        let mut store = store();
        let mut market = MarketState::new();

        for (minute, close) in [(0, 10.0), (1, 11.0), (2, 12.0)] {
            market.ingest(bar(minute, close)).unwrap();
            store.ingest(&market.view().unwrap()).unwrap();
        }

        let view = store.view();
        assert!(view.pipeline_is_ready(SmaCrossPipeline::NAME));
        assert_eq!(view.require(SmaCrossPipeline::MA_FAST).unwrap(), 11.5);
        assert_eq!(view.require(SmaCrossPipeline::MA_SLOW).unwrap(), 11.0);
    }

    #[test]
    fn should_accumulate_feature_history_per_step_after_warmup() {
        let mut store = store();
        let mut market = MarketState::new();

        for (minute, close) in [(0, 10.0), (1, 11.0), (2, 12.0), (3, 13.0)] {
            market.ingest(bar(minute, close)).unwrap();
            store.ingest(&market.view().unwrap()).unwrap();
        }

        let view = store.view();
        assert_eq!(view.series(SmaCrossPipeline::MA_FAST).unwrap(), &[11.5, 12.5]);
        assert_eq!(view.series(SmaCrossPipeline::MA_SLOW).unwrap(), &[11.0, 12.0]);
    }

    #[test]
    fn should_warm_up_again_after_reset() {
        let mut store = store();
        let mut market = MarketState::new();

        for (minute, close) in [(0, 10.0), (1, 11.0), (2, 12.0)] {
            market.ingest(bar(minute, close)).unwrap();
            store.ingest(&market.view().unwrap()).unwrap();
        }
        assert!(store.view().pipeline_is_ready(SmaCrossPipeline::NAME));

        store.reset();

        let mut market = MarketState::new();
        market.ingest(bar(10, 10.0)).unwrap();
        store.ingest(&market.view().unwrap()).unwrap();
        assert!(!store.view().pipeline_is_ready(SmaCrossPipeline::NAME));
    }
}
