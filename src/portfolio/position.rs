use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Communicative type alias for a lot identifier. A lot carries the id of the OPEN operation
/// that created it.
pub type PositionId = u64;

/// Side of the book a lot or operation acts on.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Sign applied to quantities on this side: +1 for Long, -1 for Short.
    pub fn direction(&self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

/// A single open tranche of exposure with its entry price. Created by exactly one OPEN
/// operation; extinguished when a CLOSE consumes its remaining quantity.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct FifoPosition {
    pub id: PositionId,
    pub is_active: bool,
    pub timestamp: DateTime<Utc>,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
}

/// The two insertion-ordered lot queues owned by the portfolio. Queue order is FIFO matching
/// order and must be preserved; partial closes leave a lot in place.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct LotQueues {
    long: Vec<FifoPosition>,
    short: Vec<FifoPosition>,
}

impl LotQueues {
    /// Constructs a new empty [`LotQueues`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lots on the provided [`Side`] in insertion order.
    pub fn side(&self, side: Side) -> &[FifoPosition] {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut Vec<FifoPosition> {
        match side {
            Side::Long => &mut self.long,
            Side::Short => &mut self.short,
        }
    }

    pub(crate) fn lot_mut(&mut self, side: Side, id: PositionId) -> Option<&mut FifoPosition> {
        self.side_mut(side).iter_mut().find(|lot| lot.id == id)
    }

    /// Sum of active lot quantities on the provided [`Side`].
    pub fn active_quantity(&self, side: Side) -> f64 {
        self.side(side)
            .iter()
            .filter(|lot| lot.is_active)
            .map(|lot| lot.quantity)
            .sum()
    }

    /// Signed net exposure: active long quantity minus active short quantity.
    pub fn net_position(&self) -> f64 {
        self.active_quantity(Side::Long) - self.active_quantity(Side::Short)
    }
}
