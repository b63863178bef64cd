use crate::data::market::MarketField;
use crate::feature::sma::SmaCrossPipeline;
use crate::strategy::error::StrategyError;
use crate::strategy::{Decision, Strategy, StrategyMetadata};
use crate::view::BacktestView;
use serde::{Deserialize, Serialize};
use serde_json::json;
use smol_str::SmolStr;

/// Configuration for constructing a [`MovingAverageCross`] via the new() constructor method.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Config {
    pub fast_window: usize,
    pub slow_window: usize,
}

/// Example moving-average crossover strategy. Targets +1 when the fast average trades above the
/// slow average, -1 below, and stays flat while the SMA pipeline is warming up. Reads its
/// features from the [`SmaCrossPipeline`] it declares in metadata.
pub struct MovingAverageCross {
    metadata: StrategyMetadata,
}

impl MovingAverageCross {
    /// Constructs a new [`MovingAverageCross`] component using the provided [`Config`].
    pub fn new(config: Config) -> Result<Self, StrategyError> {
        if config.fast_window == 0 || config.slow_window == 0 {
            return Err(StrategyError::Configuration(String::from(
                "fast_window and slow_window must be positive",
            )));
        }
        if config.fast_window >= config.slow_window {
            return Err(StrategyError::Configuration(String::from(
                "fast_window must be < slow_window for a classic MA cross",
            )));
        }

        Ok(Self {
            metadata: StrategyMetadata {
                name: SmolStr::new_static("moving_average_cross"),
                parameters: json!({
                    "fast_window": config.fast_window,
                    "slow_window": config.slow_window,
                }),
                required_fields: vec![MarketField::Close],
                required_pipelines: vec![SmolStr::new_static(SmaCrossPipeline::NAME)],
            },
        })
    }

    fn warming_up(view: &BacktestView<'_>) -> Decision {
        Decision {
            timestamp: view.market.timestamp(),
            target_position: 0.0,
            execution_price: view.market.bar().close,
            diagnostics: json!({
                "warming_up": true,
                "pipeline": SmaCrossPipeline::NAME,
            }),
        }
    }
}

impl Strategy for MovingAverageCross {
    fn metadata(&self) -> &StrategyMetadata {
        &self.metadata
    }

    fn decide(&self, view: &BacktestView<'_>) -> Result<Decision, StrategyError> {
        if !view.features.pipeline_is_ready(SmaCrossPipeline::NAME) {
            return Ok(Self::warming_up(view));
        }

        // A crossover regime needs two consecutive samples before it can be trusted
        if view.features.series(SmaCrossPipeline::MA_SLOW)?.len() < 2 {
            return Ok(Self::warming_up(view));
        }

        let ma_fast = view.features.require(SmaCrossPipeline::MA_FAST)?;
        let ma_slow = view.features.require(SmaCrossPipeline::MA_SLOW)?;

        let target_position = if ma_fast > ma_slow {
            1.0
        } else if ma_fast < ma_slow {
            -1.0
        } else {
            0.0
        };

        Ok(Decision {
            timestamp: view.market.timestamp(),
            target_position,
            execution_price: view.market.bar().close,
            diagnostics: json!({
                "ma_fast": ma_fast,
                "ma_slow": ma_slow,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market::Bar;
    use crate::data::state::MarketState;
    use crate::feature::sma;
    use crate::feature::store::FeatureStore;
    use crate::portfolio::portfolio::ExecutionView;
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

    fn strategy() -> MovingAverageCross {
        MovingAverageCross::new(Config {
            fast_window: 2,
            slow_window: 3,
        })
        .unwrap()
    }

    fn store() -> FeatureStore {
        FeatureStore::new(vec![Box::new(
            SmaCrossPipeline::new(sma::Config {
                fast_window: 2,
                slow_window: 3,
            })
            .unwrap(),
        )])
        .unwrap()
    }

    fn decide_sequence(closes: &[f64]) -> Vec<f64> {
        let strategy = strategy();
        let mut store = store();
        let mut market = MarketState::new();
        let mut targets = Vec::with_capacity(closes.len());

        for (minute, close) in closes.iter().enumerate() {
            market.ingest(bar(minute as u32, *close)).unwrap();
            let market_view = market.view().unwrap();
            store.ingest(&market_view).unwrap();

            let view = BacktestView {
                market: market_view,
                features: store.view(),
                execution: ExecutionView::new(0.0, 0.0, 0.0, 0.0),
            };
            targets.push(strategy.decide(&view).unwrap().target_position);
        }

        targets
    }

    #[test]
    fn should_return_err_with_fast_window_not_below_slow_window() {
        let actual = MovingAverageCross::new(Config {
            fast_window: 3,
            slow_window: 2,
        });
        assert!(matches!(actual, Err(StrategyError::Configuration(_))));
    }

    #[test]
    fn should_stay_flat_while_warming_up_then_go_long_on_rising_closes() {
        let targets = decide_sequence(&[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(targets, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn should_go_short_once_fast_average_trades_below_slow_average() {
        let targets = decide_sequence(&[13.0, 12.0, 11.0, 10.0]);
        assert_eq!(targets, vec![0.0, 0.0, 0.0, -1.0]);
    }
}
