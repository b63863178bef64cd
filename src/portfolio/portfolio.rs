use crate::portfolio::error::PortfolioError;
use crate::portfolio::fill::Fill;
use crate::portfolio::position::{FifoPosition, LotQueues, Side};
use crate::transition::operation::{FifoOperation, OperationType};
use derive_more::Constructor;
use serde::Serialize;

/// Read-only snapshot of portfolio accounting, handed to strategies & filters each step as part
/// of the backtest view.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Constructor, Serialize)]
pub struct ExecutionView {
    pub current_position: f64,
    pub cash: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
}

/// Single-instrument portfolio owning the FIFO lot book, cash, and realized & unrealized P&L.
/// Applies [`FifoOperation`]s by dispatching on their [`OperationType`] and journals every
/// mutation as a [`Fill`] in the execution log.
#[derive(Clone, PartialEq, Debug)]
pub struct Portfolio {
    starting_cash: f64,
    cash: f64,
    current_position: f64,
    realized_pnl: f64,
    unrealized_pnl: f64,
    lots: LotQueues,
    execution_log: Vec<Fill>,
}

impl Portfolio {
    /// Constructs a new flat [`Portfolio`] holding the provided starting cash.
    pub fn new(starting_cash: f64) -> Self {
        Self {
            starting_cash,
            cash: starting_cash,
            current_position: 0.0,
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
            lots: LotQueues::new(),
            execution_log: Vec::new(),
        }
    }

    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Signed net exposure, long positive, short negative.
    pub fn current_position(&self) -> f64 {
        self.current_position
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn unrealized_pnl(&self) -> f64 {
        self.unrealized_pnl
    }

    /// The FIFO lot queues, read-only. The transition engine resolves close actions against
    /// these without mutating them.
    pub fn lots(&self) -> &LotQueues {
        &self.lots
    }

    /// Every [`Fill`] journaled so far, in production order.
    pub fn execution_log(&self) -> &[Fill] {
        &self.execution_log
    }

    /// Consumes the portfolio, returning the full execution log.
    pub fn into_execution_log(self) -> Vec<Fill> {
        self.execution_log
    }

    /// Returns a read-only [`ExecutionView`] of current accounting.
    pub fn execution_view(&self) -> ExecutionView {
        ExecutionView::new(
            self.current_position,
            self.cash,
            self.realized_pnl,
            self.unrealized_pnl,
        )
    }

    /// Applies the ordered operation list, dispatching each on its [`OperationType`] and
    /// appending one [`Fill`] per operation to the execution log.
    pub fn apply_operations(
        &mut self,
        operations: &[FifoOperation],
    ) -> Result<(), PortfolioError> {
        for operation in operations {
            let fill = match operation.kind {
                OperationType::Open => self.apply_open(operation)?,
                OperationType::Close => self.apply_close(operation)?,
            };
            self.execution_log.push(fill);
        }
        Ok(())
    }

    fn apply_open(&mut self, operation: &FifoOperation) -> Result<Fill, PortfolioError> {
        self.check_operation(operation)?;

        let direction = operation.side.direction();

        let position_before = self.current_position;
        let position_after = position_before + direction * operation.quantity;

        let cash_before = self.cash;
        let cash_after = cash_before - direction * operation.quantity * operation.execution_price;

        // An OPEN creates a new lot carrying the operation id
        self.lots.side_mut(operation.side).push(FifoPosition {
            id: operation.id,
            is_active: true,
            timestamp: operation.timestamp,
            side: operation.side,
            quantity: operation.quantity,
            price: operation.execution_price,
        });

        self.current_position = position_after;
        self.cash = cash_after;

        Ok(Fill::from_operation(
            operation,
            position_before,
            position_after,
            cash_before,
            cash_after,
            Some(operation.execution_price),
            None,
            None,
        ))
    }

    fn apply_close(&mut self, operation: &FifoOperation) -> Result<Fill, PortfolioError> {
        self.check_operation(operation)?;

        let linked_id = operation
            .linked_position_id
            .ok_or(PortfolioError::MissingLinkedPosition(operation.id))?;

        let entry_price = {
            let lot = self
                .lots
                .lot_mut(operation.side, linked_id)
                .ok_or(PortfolioError::LotNotFound {
                    id: linked_id,
                    side: operation.side,
                })?;

            if !lot.is_active {
                return Err(PortfolioError::LotInactive(linked_id));
            }
            if operation.quantity > lot.quantity {
                return Err(PortfolioError::CloseExceedsLot {
                    id: linked_id,
                    quantity: operation.quantity,
                    available: lot.quantity,
                });
            }

            let entry_price = lot.price;

            // A full close extinguishes the lot; a partial close leaves it in queue position
            if operation.quantity == lot.quantity {
                lot.is_active = false;
            } else {
                lot.quantity -= operation.quantity;
            }

            entry_price
        };

        let direction = operation.side.direction();
        let pnl = (operation.execution_price - entry_price) * operation.quantity * direction;

        let position_before = self.current_position;
        let position_after = position_before - direction * operation.quantity;

        let cash_before = self.cash;
        let cash_after = cash_before + direction * operation.quantity * operation.execution_price;

        self.current_position = position_after;
        self.cash = cash_after;
        self.realized_pnl += pnl;

        Ok(Fill::from_operation(
            operation,
            position_before,
            position_after,
            cash_before,
            cash_after,
            Some(entry_price),
            Some(operation.execution_price),
            Some(pnl),
        ))
    }

    fn check_operation(&self, operation: &FifoOperation) -> Result<(), PortfolioError> {
        if !(operation.quantity > 0.0) {
            return Err(PortfolioError::InvalidQuantity(
                operation.id,
                operation.quantity,
            ));
        }
        if !(operation.execution_price > 0.0) {
            return Err(PortfolioError::InvalidPrice(
                operation.id,
                operation.execution_price,
            ));
        }
        Ok(())
    }

    /// Re-marks unrealized P&L of every active lot against the provided mark price.
    pub fn mark_to_market(&mut self, price: f64) {
        let mut unrealized = 0.0;
        for side in [Side::Long, Side::Short] {
            for lot in self.lots.side(side).iter().filter(|lot| lot.is_active) {
                unrealized += (price - lot.price) * lot.quantity * side.direction();
            }
        }
        self.unrealized_pnl = unrealized;
    }
}
