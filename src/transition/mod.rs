//! The transition engine: a small algebra turning the delta between current & target exposure
//! into executable FIFO operations.
//!
//! Three total dispatch layers compose per step:
//! * [`rule`] classifies `(state, event, current, target)` into a
//!   [`TransitionType`](rule::TransitionType),
//! * [`action`] decomposes the transition into an ordered [`AtomicAction`](action::AtomicAction)
//!   list,
//! * [`resolver`] matches close actions against the FIFO lot queues, producing
//!   [`FifoOperation`](operation::FifoOperation)s.
//!
//! [`engine::TransitionEngine`] orchestrates the three and journals a deduplicated
//! [`TransitionLog`](engine::TransitionLog).

/// Atomic open/close actions & the per-transition decomposition strategies.
pub mod action;

/// The [`TransitionEngine`](engine::TransitionEngine) orchestrating rules, strategies & the
/// FIFO resolver, plus the transition audit log.
pub mod engine;

/// Tally transition module specific errors & safety guard taxonomy.
pub mod error;

/// Executable [`FifoOperation`](operation::FifoOperation)s & the monotone operation id source.
pub mod operation;

/// The FIFO resolver matching close actions against lot queues under safety guards.
pub mod resolver;

/// Transition classification: states, events, keys, rules & transition types.
pub mod rule;
