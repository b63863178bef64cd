use crate::data::state::MarketView;
use crate::feature::error::FeatureError;
use crate::feature::store::FeatureValues;
use crate::feature::FeaturePipeline;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use ta::indicators::BollingerBands;
use ta::{Next, Reset};

/// Configuration for constructing a [`BollingerBandsPipeline`] via the new() constructor method.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Config {
    pub window: usize,
    pub num_std: f64,
}

/// Feature pipeline producing Bollinger bands of the close price: the rolling mean plus upper &
/// lower bands offset by a multiple of the rolling standard deviation.
///
/// Writes `bb_middle`, `bb_upper` & `bb_lower` and reports readiness once the window has filled
/// with observations.
#[derive(Debug)]
pub struct BollingerBandsPipeline {
    bands: BollingerBands,
    window: usize,
    observations: usize,
}

impl BollingerBandsPipeline {
    pub const NAME: &'static str = "bollinger";
    pub const BB_MIDDLE: &'static str = "bb_middle";
    pub const BB_UPPER: &'static str = "bb_upper";
    pub const BB_LOWER: &'static str = "bb_lower";

    /// Constructs a new [`BollingerBandsPipeline`] component using the provided [`Config`].
    pub fn new(config: Config) -> Result<Self, FeatureError> {
        if config.window == 0 {
            return Err(FeatureError::Configuration(String::from(
                "window must be positive",
            )));
        }
        if !(config.num_std > 0.0) {
            return Err(FeatureError::Configuration(format!(
                "num_std must be > 0, got {}",
                config.num_std
            )));
        }

        let bands = BollingerBands::new(config.window, config.num_std).map_err(|error| {
            FeatureError::Configuration(format!(
                "invalid Bollinger window {}: {:?}",
                config.window, error
            ))
        })?;

        Ok(Self {
            bands,
            window: config.window,
            observations: 0,
        })
    }
}

impl FeaturePipeline for BollingerBandsPipeline {
    fn name(&self) -> SmolStr {
        SmolStr::new_static(Self::NAME)
    }

    fn reset(&mut self) {
        self.bands.reset();
        self.observations = 0;
    }

    fn update(
        &mut self,
        market: &MarketView<'_>,
        values: &mut FeatureValues,
    ) -> Result<(), FeatureError> {
        let close = market.bar().close;
        let output = self.bands.next(close);
        self.observations += 1;

        // Bands are only formed once the window has filled
        if self.observations < self.window {
            return Ok(());
        }

        values.set_value(Self::BB_MIDDLE, output.average);
        values.set_value(Self::BB_UPPER, output.upper);
        values.set_value(Self::BB_LOWER, output.lower);
        values.set_pipeline_ready(Self::NAME)
    }
}
