/// Tally data module specific errors.
pub mod error;

/// Historical [`Bar`](market::Bar) feeds that validate their dataset before yielding.
pub mod handler;

/// Defines the canonical [`Bar`](market::Bar) and the typed [`MarketField`](market::MarketField)
/// identifiers used to key per-field rolling history.
pub mod market;

/// Market state store maintaining the latest [`Bar`](market::Bar) snapshot and a per-field
/// append-only history, exposed to downstream components as a read-only
/// [`MarketView`](state::MarketView).
pub mod state;
