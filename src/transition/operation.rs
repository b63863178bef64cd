use crate::portfolio::position::{PositionId, Side};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Communicative type alias for a monotone operation identifier.
pub type OperationId = u64;

/// Whether a [`FifoOperation`] opens new exposure or closes an existing lot.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum OperationType {
    Open,
    Close,
}

/// An executable operation produced by the FIFO resolver. An OPEN creates a new lot carrying the
/// operation id; a CLOSE targets exactly one existing lot via `linked_position_id`.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct FifoOperation {
    pub id: OperationId,
    pub timestamp: DateTime<Utc>,
    pub kind: OperationType,
    pub side: Side,
    pub quantity: f64,
    pub execution_price: f64,
    pub linked_position_id: Option<PositionId>,
}

/// Monotone source of [`OperationId`]s. Owned by the transition engine, fresh per run, so every
/// id within a run is unique and strictly increasing.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct OperationIdSource {
    next: OperationId,
}

impl OperationIdSource {
    /// Constructs a new [`OperationIdSource`] starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next [`OperationId`], advancing the source.
    pub fn next_id(&mut self) -> OperationId {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_strictly_increasing_ids_from_zero() {
        let mut ids = OperationIdSource::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }
}
