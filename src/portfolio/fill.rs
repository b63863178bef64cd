use crate::portfolio::position::{PositionId, Side};
use crate::transition::operation::{FifoOperation, OperationId, OperationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable audit record produced by applying exactly one [`FifoOperation`] to the portfolio.
/// Fills are journals of work done; they are appended to the execution log in production order
/// and handed to the exporter untouched.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Fill {
    pub timestamp: DateTime<Utc>,
    pub kind: OperationType,
    pub side: Side,
    pub quantity: f64,
    pub execution_price: f64,
    /// Entry price of the lot this fill opened or closed against.
    pub entry_price: Option<f64>,
    /// Exit price for CLOSE fills; None for OPEN fills.
    pub exit_price: Option<f64>,
    pub position_before: f64,
    pub position_after: f64,
    pub cash_before: f64,
    pub cash_after: f64,
    /// Realized P&L contributed by this fill; None for OPEN fills.
    pub realized_pnl: Option<f64>,
    pub linked_position_id: Option<PositionId>,
    pub operation_id: OperationId,
}

impl Fill {
    /// Builds a [`Fill`] journaling the provided operation & the accounting it produced.
    pub fn from_operation(
        operation: &FifoOperation,
        position_before: f64,
        position_after: f64,
        cash_before: f64,
        cash_after: f64,
        entry_price: Option<f64>,
        exit_price: Option<f64>,
        realized_pnl: Option<f64>,
    ) -> Self {
        Self {
            timestamp: operation.timestamp,
            kind: operation.kind,
            side: operation.side,
            quantity: operation.quantity,
            execution_price: operation.execution_price,
            entry_price,
            exit_price,
            position_before,
            position_after,
            cash_before,
            cash_after,
            realized_pnl,
            linked_position_id: operation.linked_position_id,
            operation_id: operation.id,
        }
    }
}
