#![forbid(unsafe_code)]
#![warn(
    unused,
    // missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::too_many_arguments)]

//! # Tally
//! Tally is a deterministic, event-driven backtesting core with an auditable FIFO lot ledger.
//! Given an ordered stream of bar-aggregated market events and a strategy that emits target
//! positions, it computes every trade that would have occurred, maintains the FIFO lot book of
//! open positions, and reports realized P&L plus a per-fill execution log.
//!
//! ## Overview
//! The core is a synchronous, single-producer pipeline. At a high level it provides several
//! de-coupled components that interact via a set of traits:
//! * **Data**: the canonical [`Bar`](data::market::Bar) plus a
//!   [`MarketState`](data::state::MarketState) store exposing an immutable snapshot & per-field
//!   rolling history each step.
//! * **Feature**: a [`FeatureStore`](feature::store::FeatureStore) running registered
//!   [`FeaturePipeline`](feature::FeaturePipeline)s against market state, with per-pipeline
//!   readiness the strategies gate on.
//! * **Strategy**: the [`Strategy`](strategy::Strategy) & [`Filter`](strategy::Filter) traits,
//!   composed by a [`StrategyOrchestrator`](strategy::orchestrator::StrategyOrchestrator) into a
//!   single [`Decision`](strategy::Decision) per bar.
//! * **Planner**: an [`ExecutionPlanner`](planner::ExecutionPlanner) lifting the decision into
//!   an [`ExecutionPlan`](planner::ExecutionPlan), optionally attaching OCO brackets.
//! * **Transition**: the [`TransitionEngine`](transition::engine::TransitionEngine) classifying
//!   the current-vs-target delta, decomposing it into atomic actions, and resolving those
//!   against the FIFO lot queues into executable operations.
//! * **Portfolio**: a [`Portfolio`](portfolio::portfolio::Portfolio) applying each operation,
//!   mutating cash, position & realized P&L, and journaling every mutation as a
//!   [`Fill`](portfolio::fill::Fill).
//! * **Engine**: the outer [`BacktestEngine`](engine::BacktestEngine) step/run loop binding the
//!   components together and emitting immutable audit records.
//!
//! The engine owns all mutable state; collaborators only ever receive a read-only
//! [`BacktestView`](view::BacktestView) built fresh per step. Every failure is fatal to the
//! current step and aborts the enclosing run - the core never retries, masks, or logs-and-
//! continues.

/// Defines the canonical [`Bar`](data::market::Bar), typed market fields, the market state
/// store, and historical bar feeds for backtesting.
pub mod data;

/// The outer backtest engine: step/run loop, run input, and the immutable step & run audit
/// records.
pub mod engine;

/// Feature pipelines & the feature store exposing their values, history and readiness to
/// strategies.
pub mod feature;

/// Provides default Tally tracing logging initialisers.
pub mod logging;

/// Execution planning: lifts a [`Decision`](strategy::Decision) into an
/// [`ExecutionPlan`](planner::ExecutionPlan), optionally attaching protective brackets.
pub mod planner;

/// Portfolio execution: the FIFO lot book, cash & P&L accounting, and the per-operation
/// [`Fill`](portfolio::fill::Fill) journal.
pub mod portfolio;

/// Strategy & filter traits, the decision type, and the orchestrator composing them.
pub mod strategy;

/// The transition engine: classification rules, decomposition strategies & the FIFO resolver
/// turning position deltas into executable operations.
pub mod transition;

/// The read-only view bundle handed to strategies, filters & planners each step.
pub mod view;
