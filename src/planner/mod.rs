use crate::strategy::Decision;
use crate::view::BacktestView;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tally planner module specific errors.
pub mod error;

/// Planner attaching fixed percentage OCO brackets to non-zero targets.
pub mod fixed_pct_oco;

/// One-Cancels-Other bracket: protective stop loss & take profit levels.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Constructor, Deserialize, Serialize)]
pub struct Oco {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

/// Execution-ready representation of a [`Decision`]. Planners preserve the decision's timestamp
/// and execution price; they may only enrich it with protective brackets.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct ExecutionPlan {
    pub timestamp: DateTime<Utc>,
    pub target_position: f64,
    pub execution_price: f64,
    pub oco: Option<Oco>,
    pub diagnostics: Value,
}

/// Lifts a [`Decision`] into an [`ExecutionPlan`].
pub trait ExecutionPlanner {
    /// Returns an [`ExecutionPlan`] for the provided decision.
    fn plan(&self, view: &BacktestView<'_>, decision: &Decision) -> ExecutionPlan;
}

/// Pure target execution: copies the decision fields unchanged and attaches no brackets.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct NoBracketsPlanner;

impl NoBracketsPlanner {
    /// Constructs a new [`NoBracketsPlanner`] component.
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionPlanner for NoBracketsPlanner {
    fn plan(&self, _: &BacktestView<'_>, decision: &Decision) -> ExecutionPlan {
        ExecutionPlan {
            timestamp: decision.timestamp,
            target_position: decision.target_position,
            execution_price: decision.execution_price,
            oco: None,
            diagnostics: decision.diagnostics.clone(),
        }
    }
}
