use crate::portfolio::position::{PositionId, Side};
use crate::transition::operation::OperationId;
use thiserror::Error;

/// All errors generated in the tally::portfolio module.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum PortfolioError {
    #[error("operation {0} quantity must be positive, got {1}")]
    InvalidQuantity(OperationId, f64),

    #[error("operation {0} execution price must be positive, got {1}")]
    InvalidPrice(OperationId, f64),

    #[error("CLOSE operation {0} is missing a linked position id")]
    MissingLinkedPosition(OperationId),

    #[error("no lot with id {id} in the {side} queue")]
    LotNotFound { id: PositionId, side: Side },

    #[error("lot {0} is no longer active")]
    LotInactive(PositionId),

    #[error("close quantity {quantity} exceeds lot {id} remaining quantity {available}")]
    CloseExceedsLot {
        id: PositionId,
        quantity: f64,
        available: f64,
    },
}
