use crate::portfolio::position::Side;
use crate::transition::error::TransitionError;
use crate::transition::operation::OperationType;
use crate::transition::rule::TransitionType;
use chrono::{DateTime, Utc};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// One of the four atomic position mutations a transition decomposes into.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum AtomicActionType {
    OpenLong,
    CloseLong,
    OpenShort,
    CloseShort,
}

impl AtomicActionType {
    /// The [`Side`] of the book this action acts on.
    pub fn side(&self) -> Side {
        match self {
            AtomicActionType::OpenLong | AtomicActionType::CloseLong => Side::Long,
            AtomicActionType::OpenShort | AtomicActionType::CloseShort => Side::Short,
        }
    }

    /// Whether this action opens new exposure or closes existing exposure.
    pub fn operation(&self) -> OperationType {
        match self {
            AtomicActionType::OpenLong | AtomicActionType::OpenShort => OperationType::Open,
            AtomicActionType::CloseLong | AtomicActionType::CloseShort => OperationType::Close,
        }
    }
}

/// Single open/close instruction with a positive quantity, produced by decomposing a
/// [`TransitionType`]. Carries the plan timestamp.
#[derive(Copy, Clone, PartialEq, Debug, Constructor, Deserialize, Serialize)]
pub struct AtomicAction {
    pub kind: AtomicActionType,
    pub quantity: f64,
    pub timestamp: DateTime<Utc>,
}

impl AtomicAction {
    fn open_long(quantity: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(AtomicActionType::OpenLong, quantity, timestamp)
    }

    fn close_long(quantity: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(AtomicActionType::CloseLong, quantity, timestamp)
    }

    fn open_short(quantity: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(AtomicActionType::OpenShort, quantity, timestamp)
    }

    fn close_short(quantity: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(AtomicActionType::CloseShort, quantity, timestamp)
    }
}

impl TransitionType {
    /// Name of the decomposition strategy handling this transition, carried into the transition
    /// audit log.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            TransitionType::NoOp => "NoOp",
            TransitionType::OpenLong => "OpenLong",
            TransitionType::OpenShort => "OpenShort",
            TransitionType::CloseLong => "CloseLong",
            TransitionType::CloseShort => "CloseShort",
            TransitionType::IncreaseLong => "IncreaseLong",
            TransitionType::IncreaseShort => "IncreaseShort",
            TransitionType::ReduceLong => "ReduceLong",
            TransitionType::ReduceShort => "ReduceShort",
            TransitionType::ReversalToLong => "ReversalToLong",
            TransitionType::ReversalToShort => "ReversalToShort",
        }
    }

    /// Decomposes this transition into its ordered list of [`AtomicAction`]s, validating the
    /// positional preconditions of the transition first.
    pub fn decompose(
        &self,
        current_position: f64,
        target_position: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<AtomicAction>, TransitionError> {
        let current = current_position;
        let target = target_position;

        match self {
            TransitionType::NoOp => {
                self.require(current == target, current, target, "current must equal target")?;
                Ok(vec![])
            }
            TransitionType::OpenLong => {
                self.require(
                    current == 0.0 && target > 0.0,
                    current,
                    target,
                    "requires current = 0 and target > 0",
                )?;
                Ok(vec![AtomicAction::open_long(target, timestamp)])
            }
            TransitionType::OpenShort => {
                self.require(
                    current == 0.0 && target < 0.0,
                    current,
                    target,
                    "requires current = 0 and target < 0",
                )?;
                Ok(vec![AtomicAction::open_short(target.abs(), timestamp)])
            }
            TransitionType::CloseLong => {
                self.require(
                    current > 0.0 && target == 0.0,
                    current,
                    target,
                    "requires current > 0 and target = 0",
                )?;
                Ok(vec![AtomicAction::close_long(current, timestamp)])
            }
            TransitionType::CloseShort => {
                self.require(
                    current < 0.0 && target == 0.0,
                    current,
                    target,
                    "requires current < 0 and target = 0",
                )?;
                Ok(vec![AtomicAction::close_short(current.abs(), timestamp)])
            }
            TransitionType::IncreaseLong => {
                self.require(
                    current > 0.0 && target > current,
                    current,
                    target,
                    "requires current > 0 and target > current",
                )?;
                Ok(vec![AtomicAction::open_long(target - current, timestamp)])
            }
            TransitionType::IncreaseShort => {
                self.require(
                    current < 0.0 && target < current,
                    current,
                    target,
                    "requires current < 0 and target < current",
                )?;
                Ok(vec![AtomicAction::open_short(
                    (target - current).abs(),
                    timestamp,
                )])
            }
            TransitionType::ReduceLong => {
                self.require(
                    current > 0.0 && target > 0.0 && current > target,
                    current,
                    target,
                    "requires current > target > 0",
                )?;
                Ok(vec![AtomicAction::close_long(current - target, timestamp)])
            }
            TransitionType::ReduceShort => {
                self.require(
                    current < 0.0 && target < 0.0 && target > current,
                    current,
                    target,
                    "requires current < target < 0",
                )?;
                Ok(vec![AtomicAction::close_short(
                    (current - target).abs(),
                    timestamp,
                )])
            }
            TransitionType::ReversalToLong => {
                self.require(
                    current < 0.0 && target > 0.0,
                    current,
                    target,
                    "requires current < 0 and target > 0",
                )?;
                Ok(vec![
                    AtomicAction::close_short(current.abs(), timestamp),
                    AtomicAction::open_long(target, timestamp),
                ])
            }
            TransitionType::ReversalToShort => {
                self.require(
                    current > 0.0 && target < 0.0,
                    current,
                    target,
                    "requires current > 0 and target < 0",
                )?;
                Ok(vec![
                    AtomicAction::close_long(current, timestamp),
                    AtomicAction::open_short(target.abs(), timestamp),
                ])
            }
        }
    }

    fn require(
        &self,
        condition: bool,
        current_position: f64,
        target_position: f64,
        precondition: &str,
    ) -> Result<(), TransitionError> {
        if condition {
            Ok(())
        } else {
            Err(TransitionError::Decomposition {
                strategy: self.strategy_name(),
                reason: format!(
                    "{}, got current={} target={}",
                    precondition, current_position, target_position
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn should_decompose_no_op_into_empty_action_list() {
        let actions = TransitionType::NoOp.decompose(2.0, 2.0, timestamp()).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn should_decompose_opens_and_closes_into_single_actions() {
        let cases = vec![
            (TransitionType::OpenLong, 0.0, 2.0, AtomicActionType::OpenLong, 2.0),
            (TransitionType::OpenShort, 0.0, -2.0, AtomicActionType::OpenShort, 2.0),
            (TransitionType::CloseLong, 2.0, 0.0, AtomicActionType::CloseLong, 2.0),
            (TransitionType::CloseShort, -2.0, 0.0, AtomicActionType::CloseShort, 2.0),
            (TransitionType::IncreaseLong, 1.0, 3.0, AtomicActionType::OpenLong, 2.0),
            (TransitionType::IncreaseShort, -1.0, -3.0, AtomicActionType::OpenShort, 2.0),
            (TransitionType::ReduceLong, 3.0, 1.0, AtomicActionType::CloseLong, 2.0),
            (TransitionType::ReduceShort, -3.0, -1.0, AtomicActionType::CloseShort, 2.0),
        ];

        for (transition, current, target, expected_kind, expected_quantity) in cases {
            let actions = transition.decompose(current, target, timestamp()).unwrap();
            assert_eq!(actions.len(), 1, "transition: {}", transition);
            assert_eq!(actions[0].kind, expected_kind, "transition: {}", transition);
            assert_eq!(
                actions[0].quantity, expected_quantity,
                "transition: {}",
                transition
            );
            assert_eq!(actions[0].timestamp, timestamp());
        }
    }

    #[test]
    fn should_decompose_reversal_to_long_as_close_short_then_open_long() {
        let actions = TransitionType::ReversalToLong
            .decompose(-2.0, 3.0, timestamp())
            .unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, AtomicActionType::CloseShort);
        assert_eq!(actions[0].quantity, 2.0);
        assert_eq!(actions[1].kind, AtomicActionType::OpenLong);
        assert_eq!(actions[1].quantity, 3.0);
    }

    #[test]
    fn should_decompose_reversal_to_short_as_close_long_then_open_short() {
        let actions = TransitionType::ReversalToShort
            .decompose(2.0, -3.0, timestamp())
            .unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, AtomicActionType::CloseLong);
        assert_eq!(actions[0].quantity, 2.0);
        assert_eq!(actions[1].kind, AtomicActionType::OpenShort);
        assert_eq!(actions[1].quantity, 3.0);
    }

    #[test]
    fn should_return_err_when_decomposition_precondition_violated() {
        let actual = TransitionType::ReduceShort.decompose(-1.0, -3.0, timestamp());
        assert!(matches!(
            actual,
            Err(TransitionError::Decomposition { strategy, .. }) if strategy == "ReduceShort"
        ));
    }

    #[test]
    fn should_expose_side_and_operation_per_action_type() {
        assert_eq!(AtomicActionType::OpenLong.side(), Side::Long);
        assert_eq!(AtomicActionType::CloseShort.side(), Side::Short);
        assert_eq!(AtomicActionType::OpenShort.operation(), OperationType::Open);
        assert_eq!(AtomicActionType::CloseLong.operation(), OperationType::Close);
    }
}
