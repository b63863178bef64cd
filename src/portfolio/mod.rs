/// Tally portfolio module specific errors.
pub mod error;

/// The [`Fill`](fill::Fill) audit record journaling each applied operation.
pub mod fill;

/// Lots, lot queues & the [`Side`](position::Side) of exposure.
pub mod position;

/// The [`Portfolio`](portfolio::Portfolio): FIFO lot book, cash & P&L accounting, and the
/// OPEN/CLOSE operation executors.
pub mod portfolio;
