use std::collections::VecDeque;

use base::entities::Order;

/// FIFO backlog of orders detected as new but not yet shown to the operator.
///
/// Appended at the tail in fetch-result order, consumed from the head. Never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingQueue {
    orders: VecDeque<Order>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn extend(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders.extend(orders);
    }

    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.orders.iter().any(|order| order.id == order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
