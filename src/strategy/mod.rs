use crate::data::market::MarketField;
use crate::strategy::error::StrategyError;
use crate::view::BacktestView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

/// Example Bollinger-band mean-reversion [`Strategy`] implementation.
pub mod bollinger;

/// Tally strategy module specific errors.
pub mod error;

/// Example [`Filter`] implementations.
pub mod filters;

/// Example moving-average crossover [`Strategy`] implementation.
pub mod ma_cross;

/// The [`StrategyOrchestrator`](orchestrator::StrategyOrchestrator) composing one strategy with
/// an ordered filter chain into a single [`Decision`].
pub mod orchestrator;

/// The strategy's desired exposure for the current bar, produced by analysing a read-only
/// [`BacktestView`]. The portfolio delta between this target and the current position drives the
/// transition engine.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Decision {
    pub timestamp: DateTime<Utc>,
    /// Desired signed exposure after the current bar, long positive, short negative.
    pub target_position: f64,
    pub execution_price: f64,
    pub diagnostics: Value,
}

/// Metadata describing a [`Strategy`]: identity, parameters, and the market fields & feature
/// pipelines it requires. Required pipelines are verified against the feature store at
/// orchestrator construction.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct StrategyMetadata {
    pub name: SmolStr,
    pub parameters: Value,
    pub required_fields: Vec<MarketField>,
    pub required_pipelines: Vec<SmolStr>,
}

/// Metadata describing a [`Filter`].
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct FilterMetadata {
    pub name: SmolStr,
    pub parameters: Value,
}

/// Determines the desired target exposure for the current bar. Pure given the view: a strategy
/// holds no rolling state of its own - that lives in feature pipelines inside the engine.
pub trait Strategy {
    fn metadata(&self) -> &StrategyMetadata;

    /// Returns a [`Decision`] for the current bar, given the read-only [`BacktestView`].
    fn decide(&self, view: &BacktestView<'_>) -> Result<Decision, StrategyError>;
}

/// Transforms an upstream [`Decision`]. Filters are folded left-to-right by the orchestrator in
/// registration order.
pub trait Filter {
    fn metadata(&self) -> &FilterMetadata;

    /// Returns the transformed [`Decision`], given the read-only [`BacktestView`] and the
    /// upstream decision.
    fn apply(
        &self,
        view: &BacktestView<'_>,
        decision: Decision,
    ) -> Result<Decision, StrategyError>;
}
