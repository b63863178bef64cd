use crate::data::market::MarketField;
use crate::feature::bollinger::BollingerBandsPipeline;
use crate::strategy::error::StrategyError;
use crate::strategy::{Decision, Strategy, StrategyMetadata};
use crate::view::BacktestView;
use serde::{Deserialize, Serialize};
use serde_json::json;
use smol_str::SmolStr;

/// Configuration for constructing a [`BollingerMeanReversion`] via the new() constructor method.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Config {
    pub window: usize,
    pub num_std: f64,
}

/// Example Bollinger-band mean-reversion strategy. Buys when the close trades below the lower
/// band, sells when it trades above the upper band, and stays flat inside the bands or while
/// the [`BollingerBandsPipeline`] is warming up.
pub struct BollingerMeanReversion {
    metadata: StrategyMetadata,
}

impl BollingerMeanReversion {
    /// Constructs a new [`BollingerMeanReversion`] component using the provided [`Config`].
    pub fn new(config: Config) -> Result<Self, StrategyError> {
        if config.window == 0 {
            return Err(StrategyError::Configuration(String::from(
                "window must be positive",
            )));
        }
        if !(config.num_std > 0.0) {
            return Err(StrategyError::Configuration(format!(
                "num_std must be > 0, got {}",
                config.num_std
            )));
        }

        Ok(Self {
            metadata: StrategyMetadata {
                name: SmolStr::new_static("bollinger_mean_reversion"),
                parameters: json!({
                    "window": config.window,
                    "num_std": config.num_std,
                }),
                required_fields: vec![MarketField::Close],
                required_pipelines: vec![SmolStr::new_static(BollingerBandsPipeline::NAME)],
            },
        })
    }
}

impl Strategy for BollingerMeanReversion {
    fn metadata(&self) -> &StrategyMetadata {
        &self.metadata
    }

    fn decide(&self, view: &BacktestView<'_>) -> Result<Decision, StrategyError> {
        let timestamp = view.market.timestamp();
        let close = view.market.bar().close;

        if !view.features.pipeline_is_ready(BollingerBandsPipeline::NAME) {
            return Ok(Decision {
                timestamp,
                target_position: 0.0,
                execution_price: close,
                diagnostics: json!({
                    "warming_up": true,
                    "pipeline": BollingerBandsPipeline::NAME,
                }),
            });
        }

        let upper = view.features.require(BollingerBandsPipeline::BB_UPPER)?;
        let lower = view.features.require(BollingerBandsPipeline::BB_LOWER)?;

        let target_position = if close < lower {
            1.0
        } else if close > upper {
            -1.0
        } else {
            0.0
        };

        Ok(Decision {
            timestamp,
            target_position,
            execution_price: close,
            diagnostics: json!({
                "close": close,
                "bb_upper": upper,
                "bb_lower": lower,
            }),
        })
    }
}
