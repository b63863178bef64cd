use crate::planner::ExecutionPlan;
use crate::portfolio::position::LotQueues;
use crate::transition::error::TransitionError;
use crate::transition::operation::{FifoOperation, OperationIdSource};
use crate::transition::resolver::FifoResolver;
use crate::transition::rule::{Event, State, TransitionKey, TransitionType};
use serde::Serialize;
use tracing::debug;

/// Composite audit record of one classification, decomposition & resolution pass.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct TransitionLog {
    pub state: State,
    pub event: Event,
    pub current_position: f64,
    pub target_position: f64,
    pub rule: &'static str,
    pub strategy: &'static str,
    pub transition: TransitionType,
    pub actions: usize,
    pub operations: usize,
}

/// Orchestrates rules, decomposition strategies & the FIFO resolver: turns one
/// [`ExecutionPlan`] into the ordered [`FifoOperation`] list that realises it against the
/// current lot queues.
#[derive(Debug, Default)]
pub struct TransitionEngine {
    resolver: FifoResolver,
    ids: OperationIdSource,
    last_entry: Option<TransitionLog>,
    log: Vec<TransitionLog>,
}

impl TransitionEngine {
    /// Constructs a new [`TransitionEngine`] with a fresh operation id source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies, decomposes & resolves the provided plan against the current position and lot
    /// queues. Emits a deduplicated [`TransitionLog`] entry at debug level.
    pub fn process(
        &mut self,
        plan: &ExecutionPlan,
        current_position: f64,
        lots: &LotQueues,
    ) -> Result<Vec<FifoOperation>, TransitionError> {
        let key = TransitionKey::compute(current_position, plan.target_position);
        let rule = key.rule();
        let transition = rule.classify(current_position, plan.target_position)?;

        let actions = transition.decompose(current_position, plan.target_position, plan.timestamp)?;

        let operations =
            self.resolver
                .resolve(&actions, lots, plan.execution_price, &mut self.ids)?;

        let entry = TransitionLog {
            state: key.state,
            event: key.event,
            current_position,
            target_position: plan.target_position,
            rule: rule.name(),
            strategy: transition.strategy_name(),
            transition,
            actions: actions.len(),
            operations: operations.len(),
        };

        // Consecutive identical resolutions are only journaled & logged once
        if self.last_entry.as_ref() != Some(&entry) {
            debug!(
                state = %entry.state,
                event = %entry.event,
                current = entry.current_position,
                target = entry.target_position,
                rule = entry.rule,
                strategy = entry.strategy,
                transition = %entry.transition,
                actions = entry.actions,
                operations = entry.operations,
                "transition resolved"
            );
            self.log.push(entry.clone());
            self.last_entry = Some(entry);
        }

        Ok(operations)
    }

    /// The deduplicated transition audit log accumulated so far.
    pub fn log(&self) -> &[TransitionLog] {
        &self.log
    }

    /// Consumes the engine, returning the accumulated transition audit log.
    pub fn into_log(self) -> Vec<TransitionLog> {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn plan(target_position: f64, execution_price: f64) -> ExecutionPlan {
        ExecutionPlan {
            timestamp: timestamp(),
            target_position,
            execution_price,
            oco: None,
            diagnostics: serde_json::Value::Null,
        }
    }

    #[test]
    fn should_produce_no_operations_for_flat_to_flat() {
        let mut engine = TransitionEngine::new();

        let operations = engine
            .process(&plan(0.0, 100.0), 0.0, &LotQueues::new())
            .unwrap();

        assert!(operations.is_empty());
        assert_eq!(engine.log().len(), 1);
        assert_eq!(engine.log()[0].transition, TransitionType::NoOp);
    }

    #[test]
    fn should_produce_single_open_operation_for_flat_to_long() {
        let mut engine = TransitionEngine::new();

        let operations = engine
            .process(&plan(2.0, 100.0), 0.0, &LotQueues::new())
            .unwrap();

        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].quantity, 2.0);
        assert_eq!(engine.log()[0].rule, "OpenLongFromFlatRule");
        assert_eq!(engine.log()[0].strategy, "OpenLong");
    }

    #[test]
    fn should_deduplicate_consecutive_identical_log_entries() {
        let mut engine = TransitionEngine::new();

        engine
            .process(&plan(0.0, 100.0), 0.0, &LotQueues::new())
            .unwrap();
        engine
            .process(&plan(0.0, 100.0), 0.0, &LotQueues::new())
            .unwrap();
        engine
            .process(&plan(2.0, 100.0), 0.0, &LotQueues::new())
            .unwrap();

        let transitions = engine
            .log()
            .iter()
            .map(|entry| entry.transition)
            .collect::<Vec<_>>();
        assert_eq!(transitions, vec![TransitionType::NoOp, TransitionType::OpenLong]);
    }
}
