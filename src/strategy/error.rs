use crate::feature::error::FeatureError;
use smol_str::SmolStr;
use thiserror::Error;

/// All errors generated in the tally::strategy module.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum StrategyError {
    #[error("strategy requires unknown feature pipeline: {0}")]
    UnknownPipeline(SmolStr),

    #[error("invalid strategy configuration: {0}")]
    Configuration(String),

    #[error("feature interaction failed: {0}")]
    Feature(#[from] FeatureError),
}
