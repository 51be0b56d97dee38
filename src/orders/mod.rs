//! Order domain model - resting orders, fills, and desired quote levels

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::warn;

use crate::core::types::{ExecutionId, OrderId, Pair, Price, Quantity, Side};

/// Venue-reported order status. `Live` is the initial state; `Cancelled`
/// is terminal. Transitions are pass-throughs of whatever the
/// order-management boundary reports, sequencing is its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Live,
    Matching,
    Filled,
    Cancelled,
}

/// One quoted price/size point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
}

/// The desired quote state for one pair at one refresh cycle. Level order
/// matters: equality is element-wise over same-length sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderGroup {
    pub pair: Pair,
    pub levels: Vec<OrderLevel>,
}

/// An immutable fill event against a resting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub id: ExecutionId,
    pub pair: Pair,
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
    /// True when the local party was the passive (resting) side
    pub maker: bool,
}

/// A resting order tracked in-process. Never deleted; terminal states are
/// cancellation and a full fill.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub pair: Pair,
    pub price: Price,
    pub quantity: Quantity,
    pub filled: Quantity,
    pub side: Side,
    pub status: OrderStatus,
    pub execution_ids: HashSet<ExecutionId>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Derive a fill event from this order. Pair, price and side are
    /// copied unchanged; the caller supplies the id, quantity and maker
    /// flag reported by the venue.
    pub fn create_execution(
        &self,
        execution_id: ExecutionId,
        quantity: Quantity,
        maker: bool,
    ) -> Execution {
        Execution {
            id: execution_id,
            pair: self.pair.clone(),
            price: self.price,
            quantity,
            side: self.side,
            maker,
        }
    }

    /// Apply a fill. `filled` saturates at `quantity`: an over-fill is a
    /// venue inconsistency, logged and clamped rather than propagated.
    pub fn execute(&mut self, execution: &Execution) {
        let next = self.filled + execution.quantity;
        if next > self.quantity {
            warn!(
                order = %self.id,
                filled = %next,
                quantity = %self.quantity,
                "over-fill clamped to order quantity"
            );
            self.filled = self.quantity;
        } else {
            self.filled = next;
        }
    }

    /// Record a fill id. Set semantics: inserting an id twice is a no-op.
    pub fn add_execution_id(&mut self, execution_id: ExecutionId) {
        self.execution_ids.insert(execution_id);
    }

    /// Pass-through status assignment; any status may become any other.
    pub fn change_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Terminal predicate: cancelled, or completely filled.
    pub fn finished(&self) -> bool {
        self.status == OrderStatus::Cancelled
            || (self.quantity > Quantity::ZERO && self.filled >= self.quantity)
    }

    pub fn remaining(&self) -> Quantity {
        if self.filled >= self.quantity {
            Quantity::ZERO
        } else {
            Quantity::new(self.quantity.as_decimal() - self.filled.as_decimal())
        }
    }
}

/// Chainable builder for [`Order`]. Fields left unset build at their
/// zero-value defaults (price/quantity/filled zero, side buy, status live).
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    id: OrderId,
    pair: Pair,
    price: Price,
    quantity: Quantity,
    filled: Quantity,
    side: Side,
    status: OrderStatus,
}

impl OrderBuilder {
    pub fn new(id: OrderId, pair: Pair) -> Self {
        Self {
            id,
            pair,
            price: Price::ZERO,
            quantity: Quantity::ZERO,
            filled: Quantity::ZERO,
            side: Side::Buy,
            status: OrderStatus::Live,
        }
    }

    pub fn price(mut self, price: Price) -> Self {
        self.price = price;
        self
    }

    pub fn quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn filled(mut self, filled: Quantity) -> Self {
        self.filled = filled;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Order {
        Order {
            id: self.id,
            pair: self.pair,
            price: self.price,
            quantity: self.quantity,
            filled: self.filled,
            side: self.side,
            status: self.status,
            execution_ids: HashSet::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_order(quantity: Quantity, filled: Quantity) -> Order {
        OrderBuilder::new(OrderId::new("ID"), Pair::of("A", "B"))
            .price(Price::new(5))
            .quantity(quantity)
            .filled(filled)
            .side(Side::Buy)
            .build()
    }

    #[test]
    fn test_execution_equality() {
        let pair = Pair::of("A", "B");
        let e1 = Execution {
            id: ExecutionId::new(""),
            pair: pair.clone(),
            price: Price::new(5),
            quantity: Quantity::new(10),
            side: Side::Buy,
            maker: true,
        };
        let e2 = e1.clone();
        assert_eq!(e1, e2);

        let e3 = Execution {
            price: Price::new(10),
            ..e1.clone()
        };
        assert_ne!(e1, e3);

        let e4 = Execution {
            maker: false,
            ..e1.clone()
        };
        assert_ne!(e1, e4);
    }

    #[test]
    fn test_executions_can_be_created_from_orders() {
        let order = live_order(Quantity::new(10), Quantity::new(1));

        let actual = order.create_execution(ExecutionId::new("E"), Quantity::new(10), true);
        let expected = Execution {
            id: ExecutionId::new("E"),
            pair: Pair::of("A", "B"),
            price: Price::new(5),
            quantity: Quantity::new(10),
            side: Side::Buy,
            maker: true,
        };

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_execute_increases_the_filled_quantity() {
        let mut order = live_order(Quantity::new(10), Quantity::ZERO);
        let ex = order.create_execution(ExecutionId::new(""), Quantity::new(3), true);

        assert_eq!(Quantity::ZERO, order.filled);
        order.execute(&ex);
        assert_eq!(Quantity::new(3), order.filled);
    }

    #[test]
    fn test_over_fill_clamps_at_quantity() {
        let mut order = live_order(Quantity::new(10), Quantity::new(8));
        let ex = order.create_execution(ExecutionId::new(""), Quantity::new(5), false);

        order.execute(&ex);
        assert_eq!(Quantity::new(10), order.filled);
    }

    #[test]
    fn test_add_execution_id_is_idempotent() {
        let mut order = live_order(Quantity::new(10), Quantity::ZERO);
        order.add_execution_id(ExecutionId::new("E1"));
        order.add_execution_id(ExecutionId::new("E1"));
        order.add_execution_id(ExecutionId::new("E2"));

        assert_eq!(order.execution_ids.len(), 2);
    }

    #[test]
    fn test_finished_on_cancellation() {
        let mut order = live_order(Quantity::new(10), Quantity::ZERO);
        assert!(!order.finished());

        order.change_status(OrderStatus::Cancelled);
        assert!(order.finished());
    }

    #[test]
    fn test_finished_on_full_fill() {
        let mut order = live_order(Quantity::new(10), Quantity::ZERO);
        let ex = order.create_execution(ExecutionId::new(""), Quantity::new(10), true);

        order.execute(&ex);
        assert!(order.finished());
        assert_eq!(Quantity::ZERO, order.remaining());
    }

    #[test]
    fn test_partially_filled_live_order_is_not_finished() {
        let mut order = live_order(Quantity::new(10), Quantity::ZERO);
        let ex = order.create_execution(ExecutionId::new(""), Quantity::new(4), true);

        order.execute(&ex);
        assert!(!order.finished());
        assert_eq!(Quantity::new(6), order.remaining());
    }

    #[test]
    fn test_builder_defaults() {
        let order = OrderBuilder::new(OrderId::new("ID"), Pair::of("A", "B")).build();

        assert_eq!(order.price, Price::ZERO);
        assert_eq!(order.quantity, Quantity::ZERO);
        assert_eq!(order.filled, Quantity::ZERO);
        assert_eq!(order.status, OrderStatus::Live);
        // zero-quantity orders are never considered fully filled
        assert!(!order.finished());
    }

    #[test]
    fn test_order_group_equality_is_elementwise() {
        let bid = OrderLevel {
            price: Price::new(99),
            quantity: Quantity::new(10),
            side: Side::Buy,
        };
        let ask = OrderLevel {
            price: Price::new(101),
            quantity: Quantity::new(10),
            side: Side::Sell,
        };

        let g1 = OrderGroup {
            pair: Pair::of("A", "B"),
            levels: vec![bid, ask],
        };
        let g2 = OrderGroup {
            pair: Pair::of("A", "B"),
            levels: vec![bid, ask],
        };
        let reversed = OrderGroup {
            pair: Pair::of("A", "B"),
            levels: vec![ask, bid],
        };
        let shorter = OrderGroup {
            pair: Pair::of("A", "B"),
            levels: vec![bid],
        };

        assert_eq!(g1, g2);
        assert_ne!(g1, reversed);
        assert_ne!(g1, shorter);
    }
}
