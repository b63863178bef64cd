use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Safety guard families evaluated by the FIFO resolver before any lot walk.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum GuardKind {
    ActionPrice,
    ActionQuantity,
    ActionType,
    ActionTimestamp,
    FifoCapacity,
}

/// All errors generated in the tally::transition module.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum TransitionError {
    #[error("{rule} cannot classify transition: {reason}")]
    Classification { rule: &'static str, reason: String },

    #[error("{strategy} cannot decompose transition: {reason}")]
    Decomposition {
        strategy: &'static str,
        reason: String,
    },

    #[error("safety guard {kind} violated: {reason}")]
    Guard { kind: GuardKind, reason: String },
}
