use crate::data::error::DataError;
use crate::feature::error::FeatureError;
use crate::planner::error::PlannerError;
use crate::portfolio::error::PortfolioError;
use crate::strategy::error::StrategyError;
use crate::transition::error::TransitionError;
use thiserror::Error;

/// All errors generated during construction or execution of a
/// [`BacktestEngine`](crate::engine::BacktestEngine) run. Every failure is fatal to the current
/// step, which in turn aborts the enclosing run.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum EngineError {
    #[error("failed to build struct due to incomplete attributes provided")]
    BuilderIncomplete,

    #[error("backtest invariant violated: {0}")]
    Invariant(String),

    #[error("market data failure: {0}")]
    Data(#[from] DataError),

    #[error("feature pipeline failure: {0}")]
    Feature(#[from] FeatureError),

    #[error("strategy failure: {0}")]
    Strategy(#[from] StrategyError),

    #[error("planner failure: {0}")]
    Planner(#[from] PlannerError),

    #[error("transition failure: {0}")]
    Transition(#[from] TransitionError),

    #[error("portfolio execution failure: {0}")]
    Portfolio(#[from] PortfolioError),
}
