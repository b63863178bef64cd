use smol_str::SmolStr;
use thiserror::Error;

/// All errors generated in the tally::feature module.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum FeatureError {
    #[error("duplicate feature pipeline name: {0}")]
    DuplicatePipeline(SmolStr),

    #[error("unknown feature pipeline: {0}")]
    UnknownPipeline(SmolStr),

    #[error("missing feature value: {0}")]
    MissingValue(SmolStr),

    #[error("missing feature history: {0}")]
    MissingHistory(SmolStr),

    #[error("invalid feature pipeline configuration: {0}")]
    Configuration(String),
}
