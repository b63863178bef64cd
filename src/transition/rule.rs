use crate::transition::error::TransitionError;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Sign class of the current position.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum State {
    Flat,
    Long,
    Short,
}

impl State {
    /// Classifies a signed current position by its sign.
    pub fn from_position(position: f64) -> Self {
        if position > 0.0 {
            State::Long
        } else if position < 0.0 {
            State::Short
        } else {
            State::Flat
        }
    }
}

/// Sign class of the target position.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum Event {
    GoFlat,
    GoLong,
    GoShort,
}

impl Event {
    /// Classifies a signed target position by its sign.
    pub fn from_target(target: f64) -> Self {
        if target > 0.0 {
            Event::GoLong
        } else if target < 0.0 {
            Event::GoShort
        } else {
            Event::GoFlat
        }
    }
}

/// Key identifying the transition rule registered for a (state, event) pair.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct TransitionKey {
    pub state: State,
    pub event: Event,
}

impl TransitionKey {
    /// Computes the [`TransitionKey`] for the provided current & target positions.
    pub fn compute(current_position: f64, target_position: f64) -> Self {
        Self {
            state: State::from_position(current_position),
            event: Event::from_target(target_position),
        }
    }

    /// Total mapping from key to rule. Every (state, event) pair is covered at compile time, so
    /// an incomplete rule cover cannot exist.
    pub fn rule(&self) -> TransitionRule {
        match (self.state, self.event) {
            (State::Flat, Event::GoFlat) => TransitionRule::NoOperation,
            (State::Flat, Event::GoLong) => TransitionRule::OpenLongFromFlat,
            (State::Flat, Event::GoShort) => TransitionRule::OpenShortFromFlat,
            (State::Long, Event::GoFlat) => TransitionRule::CloseLongFromLong,
            (State::Short, Event::GoFlat) => TransitionRule::CloseShortFromShort,
            (State::Long, Event::GoLong) => TransitionRule::AdjustLongFromLong,
            (State::Short, Event::GoShort) => TransitionRule::AdjustShortFromShort,
            (State::Long, Event::GoShort) => TransitionRule::ReversalToShortFromLong,
            (State::Short, Event::GoLong) => TransitionRule::ReversalToLongFromShort,
        }
    }
}

/// Classified change of exposure between the current & target position.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum TransitionType {
    NoOp,
    OpenLong,
    OpenShort,
    CloseLong,
    CloseShort,
    IncreaseLong,
    IncreaseShort,
    ReduceLong,
    ReduceShort,
    ReversalToLong,
    ReversalToShort,
}

/// One classification rule per (state, event) pair. Each rule validates the positional
/// preconditions of its key before classifying, failing fast on violation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TransitionRule {
    NoOperation,
    OpenLongFromFlat,
    OpenShortFromFlat,
    CloseLongFromLong,
    CloseShortFromShort,
    AdjustLongFromLong,
    AdjustShortFromShort,
    ReversalToShortFromLong,
    ReversalToLongFromShort,
}

impl TransitionRule {
    /// Name of this rule, carried into the transition audit log.
    pub fn name(&self) -> &'static str {
        match self {
            TransitionRule::NoOperation => "NoOperationRule",
            TransitionRule::OpenLongFromFlat => "OpenLongFromFlatRule",
            TransitionRule::OpenShortFromFlat => "OpenShortFromFlatRule",
            TransitionRule::CloseLongFromLong => "CloseLongFromLongRule",
            TransitionRule::CloseShortFromShort => "CloseShortFromShortRule",
            TransitionRule::AdjustLongFromLong => "AdjustLongFromLongRule",
            TransitionRule::AdjustShortFromShort => "AdjustShortFromShortRule",
            TransitionRule::ReversalToShortFromLong => "ReversalToShortFromLongRule",
            TransitionRule::ReversalToLongFromShort => "ReversalToLongFromShortRule",
        }
    }

    /// Classifies the provided current & target positions into a [`TransitionType`].
    pub fn classify(
        &self,
        current_position: f64,
        target_position: f64,
    ) -> Result<TransitionType, TransitionError> {
        match self {
            TransitionRule::NoOperation => {
                self.require(
                    current_position == 0.0 && target_position == 0.0,
                    current_position,
                    target_position,
                    "requires current = 0 and target = 0",
                )?;
                Ok(TransitionType::NoOp)
            }
            TransitionRule::OpenLongFromFlat => {
                self.require(
                    current_position == 0.0 && target_position > 0.0,
                    current_position,
                    target_position,
                    "requires current = 0 and target > 0",
                )?;
                Ok(TransitionType::OpenLong)
            }
            TransitionRule::OpenShortFromFlat => {
                self.require(
                    current_position == 0.0 && target_position < 0.0,
                    current_position,
                    target_position,
                    "requires current = 0 and target < 0",
                )?;
                Ok(TransitionType::OpenShort)
            }
            TransitionRule::CloseLongFromLong => {
                self.require(
                    current_position > 0.0 && target_position == 0.0,
                    current_position,
                    target_position,
                    "requires current > 0 and target = 0",
                )?;
                Ok(TransitionType::CloseLong)
            }
            TransitionRule::CloseShortFromShort => {
                self.require(
                    current_position < 0.0 && target_position == 0.0,
                    current_position,
                    target_position,
                    "requires current < 0 and target = 0",
                )?;
                Ok(TransitionType::CloseShort)
            }
            TransitionRule::AdjustLongFromLong => {
                self.require(
                    current_position > 0.0 && target_position > 0.0,
                    current_position,
                    target_position,
                    "requires current > 0 and target > 0",
                )?;
                if target_position == current_position {
                    Ok(TransitionType::NoOp)
                } else if target_position > current_position {
                    Ok(TransitionType::IncreaseLong)
                } else {
                    Ok(TransitionType::ReduceLong)
                }
            }
            TransitionRule::AdjustShortFromShort => {
                self.require(
                    current_position < 0.0 && target_position < 0.0,
                    current_position,
                    target_position,
                    "requires current < 0 and target < 0",
                )?;
                if target_position == current_position {
                    Ok(TransitionType::NoOp)
                } else if target_position.abs() > current_position.abs() {
                    Ok(TransitionType::IncreaseShort)
                } else {
                    Ok(TransitionType::ReduceShort)
                }
            }
            TransitionRule::ReversalToShortFromLong => {
                self.require(
                    current_position > 0.0 && target_position < 0.0,
                    current_position,
                    target_position,
                    "requires current > 0 and target < 0",
                )?;
                Ok(TransitionType::ReversalToShort)
            }
            TransitionRule::ReversalToLongFromShort => {
                self.require(
                    current_position < 0.0 && target_position > 0.0,
                    current_position,
                    target_position,
                    "requires current < 0 and target > 0",
                )?;
                Ok(TransitionType::ReversalToLong)
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
            Err(TransitionError::Classification {
                rule: self.name(),
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

    #[test]
    fn should_compute_key_from_position_signs() {
        let key = TransitionKey::compute(0.0, 2.0);
        assert_eq!(key.state, State::Flat);
        assert_eq!(key.event, Event::GoLong);

        let key = TransitionKey::compute(-1.0, 0.0);
        assert_eq!(key.state, State::Short);
        assert_eq!(key.event, Event::GoFlat);
    }

    #[test]
    fn should_map_every_key_to_its_registered_rule() {
        let cases = vec![
            (State::Flat, Event::GoFlat, TransitionRule::NoOperation),
            (State::Flat, Event::GoLong, TransitionRule::OpenLongFromFlat),
            (State::Flat, Event::GoShort, TransitionRule::OpenShortFromFlat),
            (State::Long, Event::GoFlat, TransitionRule::CloseLongFromLong),
            (State::Short, Event::GoFlat, TransitionRule::CloseShortFromShort),
            (State::Long, Event::GoLong, TransitionRule::AdjustLongFromLong),
            (State::Short, Event::GoShort, TransitionRule::AdjustShortFromShort),
            (State::Long, Event::GoShort, TransitionRule::ReversalToShortFromLong),
            (State::Short, Event::GoLong, TransitionRule::ReversalToLongFromShort),
        ];

        for (state, event, expected) in cases {
            assert_eq!(TransitionKey { state, event }.rule(), expected);
        }
    }

    #[test]
    fn should_classify_every_non_adjust_key() {
        let cases = vec![
            (0.0, 0.0, TransitionType::NoOp),
            (0.0, 1.0, TransitionType::OpenLong),
            (0.0, -1.0, TransitionType::OpenShort),
            (1.0, 0.0, TransitionType::CloseLong),
            (-1.0, 0.0, TransitionType::CloseShort),
            (1.0, -1.0, TransitionType::ReversalToShort),
            (-1.0, 1.0, TransitionType::ReversalToLong),
        ];

        for (current, target, expected) in cases {
            let rule = TransitionKey::compute(current, target).rule();
            assert_eq!(rule.classify(current, target).unwrap(), expected);
        }
    }

    #[test]
    fn should_classify_long_adjustments_by_target_comparison() {
        let rule = TransitionRule::AdjustLongFromLong;
        assert_eq!(rule.classify(2.0, 2.0).unwrap(), TransitionType::NoOp);
        assert_eq!(rule.classify(2.0, 3.0).unwrap(), TransitionType::IncreaseLong);
        assert_eq!(rule.classify(2.0, 1.0).unwrap(), TransitionType::ReduceLong);
    }

    #[test]
    fn should_classify_short_adjustments_by_magnitude_comparison() {
        let rule = TransitionRule::AdjustShortFromShort;
        assert_eq!(rule.classify(-2.0, -2.0).unwrap(), TransitionType::NoOp);
        assert_eq!(rule.classify(-2.0, -3.0).unwrap(), TransitionType::IncreaseShort);
        assert_eq!(rule.classify(-2.0, -1.0).unwrap(), TransitionType::ReduceShort);
    }

    #[test]
    fn should_return_err_when_rule_precondition_violated() {
        let actual = TransitionRule::OpenLongFromFlat.classify(1.0, 2.0);
        assert!(matches!(
            actual,
            Err(TransitionError::Classification { rule, .. }) if rule == "OpenLongFromFlatRule"
        ));
    }
}
