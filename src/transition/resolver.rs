use crate::portfolio::position::{LotQueues, Side};
use crate::transition::action::{AtomicAction, AtomicActionType};
use crate::transition::error::{GuardKind, TransitionError};
use crate::transition::operation::{FifoOperation, OperationIdSource, OperationType};

/// Matches atomic actions against the FIFO lot queues to produce executable
/// [`FifoOperation`]s. The resolver never mutates the queues; mutation happens only when the
/// portfolio applies the resolved operations.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct FifoResolver;

impl FifoResolver {
    /// Constructs a new [`FifoResolver`] component.
    pub fn new() -> Self {
        Self
    }

    /// Resolves the ordered action list into an ordered [`FifoOperation`] list, evaluating every
    /// safety guard before walking any queue.
    pub fn resolve(
        &self,
        actions: &[AtomicAction],
        lots: &LotQueues,
        execution_price: f64,
        ids: &mut OperationIdSource,
    ) -> Result<Vec<FifoOperation>, TransitionError> {
        let mut operations = Vec::with_capacity(actions.len());
        for action in actions {
            operations.extend(self.resolve_action(action, lots, execution_price, ids)?);
        }
        Ok(operations)
    }

    fn resolve_action(
        &self,
        action: &AtomicAction,
        lots: &LotQueues,
        execution_price: f64,
        ids: &mut OperationIdSource,
    ) -> Result<Vec<FifoOperation>, TransitionError> {
        check_price(execution_price)?;
        check_quantity(action.quantity)?;

        match action.kind {
            AtomicActionType::OpenLong => Ok(vec![self.open(
                action,
                AtomicActionType::OpenLong,
                execution_price,
                ids,
            )?]),
            AtomicActionType::OpenShort => Ok(vec![self.open(
                action,
                AtomicActionType::OpenShort,
                execution_price,
                ids,
            )?]),
            AtomicActionType::CloseLong => self.close_from_queue(
                action,
                AtomicActionType::CloseLong,
                lots,
                execution_price,
                ids,
            ),
            AtomicActionType::CloseShort => self.close_from_queue(
                action,
                AtomicActionType::CloseShort,
                lots,
                execution_price,
                ids,
            ),
        }
    }

    fn open(
        &self,
        action: &AtomicAction,
        expected: AtomicActionType,
        execution_price: f64,
        ids: &mut OperationIdSource,
    ) -> Result<FifoOperation, TransitionError> {
        check_kind(action, expected)?;

        Ok(FifoOperation {
            id: ids.next_id(),
            timestamp: action.timestamp,
            kind: OperationType::Open,
            side: action.kind.side(),
            quantity: action.quantity,
            execution_price,
            linked_position_id: None,
        })
    }

    fn close_from_queue(
        &self,
        action: &AtomicAction,
        expected: AtomicActionType,
        lots: &LotQueues,
        execution_price: f64,
        ids: &mut OperationIdSource,
    ) -> Result<Vec<FifoOperation>, TransitionError> {
        check_kind(action, expected)?;

        let side = action.kind.side();
        check_capacity(action.quantity, side, lots)?;

        let mut remaining = action.quantity;
        let mut operations = Vec::new();

        for lot in lots.side(side) {
            if !lot.is_active || lot.quantity <= 0.0 {
                continue;
            }

            let close_quantity = remaining.min(lot.quantity);
            operations.push(FifoOperation {
                id: ids.next_id(),
                timestamp: action.timestamp,
                kind: OperationType::Close,
                side,
                quantity: close_quantity,
                execution_price,
                linked_position_id: Some(lot.id),
            });

            remaining -= close_quantity;
            if remaining <= 0.0 {
                break;
            }
        }

        if remaining > 0.0 {
            return Err(TransitionError::Guard {
                kind: GuardKind::FifoCapacity,
                reason: format!("insufficient FIFO capacity: missing {}", remaining),
            });
        }

        Ok(operations)
    }
}

fn check_price(execution_price: f64) -> Result<(), TransitionError> {
    if execution_price.is_nan() || execution_price <= 0.0 {
        return Err(TransitionError::Guard {
            kind: GuardKind::ActionPrice,
            reason: format!("execution price must be > 0, got {}", execution_price),
        });
    }
    Ok(())
}

fn check_quantity(quantity: f64) -> Result<(), TransitionError> {
    if !(quantity > 0.0) {
        return Err(TransitionError::Guard {
            kind: GuardKind::ActionQuantity,
            reason: format!("action quantity must be > 0, got {}", quantity),
        });
    }
    Ok(())
}

fn check_kind(action: &AtomicAction, expected: AtomicActionType) -> Result<(), TransitionError> {
    if action.kind != expected {
        return Err(TransitionError::Guard {
            kind: GuardKind::ActionType,
            reason: format!("expected {} action, got {}", expected, action.kind),
        });
    }
    Ok(())
}

fn check_capacity(quantity: f64, side: Side, lots: &LotQueues) -> Result<(), TransitionError> {
    let available = lots.active_quantity(side);
    if available < quantity {
        return Err(TransitionError::Guard {
            kind: GuardKind::FifoCapacity,
            reason: format!(
                "close of {} exceeds active {} quantity {}",
                quantity, side, available
            ),
        });
    }
    Ok(())
}
