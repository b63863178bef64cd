use crate::data::market::Bar;
use crate::portfolio::fill::Fill;
use crate::portfolio::portfolio::ExecutionView;
use crate::strategy::Decision;
use crate::transition::engine::TransitionLog;
use crate::transition::operation::FifoOperation;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use serde::Serialize;
use serde_json::Value;
use smol_str::SmolStr;
use uuid::Uuid;

/// Lego components describing one backtest run: the instrument traded & the ordered bar stream.
#[derive(Clone, PartialEq, Debug, Constructor)]
pub struct BacktestInput<Events> {
    pub instrument: SmolStr,
    pub events: Events,
}

/// Immutable audit record emitted by every engine step.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct StepRecord {
    pub timestamp: DateTime<Utc>,
    pub event: Bar,
    pub decision: Decision,
    pub operations: Vec<FifoOperation>,
    pub execution_after: ExecutionView,
    pub diagnostics: Value,
}

/// Headline metrics of a completed run.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Constructor, Serialize)]
pub struct RunMetrics {
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub final_cash: f64,
    pub final_position: f64,
}

/// Everything a completed run produced, handed to the exporter as-is: headline metrics, the
/// ordered [`Fill`] execution log & the deduplicated transition audit log.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub instrument: SmolStr,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub metrics: RunMetrics,
    pub execution_log: Vec<Fill>,
    pub transition_log: Vec<TransitionLog>,
    pub diagnostics: Value,
}
