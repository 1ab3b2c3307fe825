use base::entities::{Order, OrderTimestamp};

use crate::pending_queue::PendingQueue;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No popup is shown. The queue may still hold orders retained after a dismissal.
    Idle,
    /// Exactly one order awaits acknowledgment.
    Displaying,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    OrdersFetched(Vec<Order>),
    Acknowledged,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    PlayNotification,
    PrintTicket(Order),
    PersistCursor(OrderTimestamp),
}

/// State of the new-order workflow.
///
/// `cursor` is the last acknowledged creation time and only moves on acknowledgment.
/// `watermark` is the highest creation time seen by polling; it starts at the cursor and
/// keeps repeated polls of an unchanged listing from flagging the same orders again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    active_popup: Option<Order>,
    pending: PendingQueue,
    watermark: Option<OrderTimestamp>,
    cursor: Option<OrderTimestamp>,
}

impl FeedState {
    pub fn new(cursor: Option<OrderTimestamp>) -> Self {
        Self {
            active_popup: None,
            pending: PendingQueue::new(),
            watermark: cursor,
            cursor,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        match self.active_popup {
            Some(_) => FeedPhase::Displaying,
            None => FeedPhase::Idle,
        }
    }

    pub fn active_popup(&self) -> Option<&Order> {
        self.active_popup.as_ref()
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn cursor(&self) -> Option<OrderTimestamp> {
        self.cursor
    }

    pub fn watermark(&self) -> Option<OrderTimestamp> {
        self.watermark
    }

    pub fn transition(self, event: FeedEvent) -> (FeedState, Vec<SideEffect>) {
        match event {
            FeedEvent::OrdersFetched(orders) => self.on_orders_fetched(orders),
            FeedEvent::Acknowledged => self.on_acknowledged(),
            FeedEvent::Dismissed => self.on_dismissed(),
        }
    }

    fn is_new(&self, order: &Order) -> bool {
        let after_watermark = match self.watermark {
            None => true,
            Some(watermark) => order.props.created_at > watermark,
        };

        let already_held = self
            .active_popup
            .as_ref()
            .map_or(false, |active| active.id == order.id)
            || self.pending.contains(&order.id);

        after_watermark && !already_held
    }

    fn on_orders_fetched(mut self, orders: Vec<Order>) -> (FeedState, Vec<SideEffect>) {
        let mut new_orders: Vec<Order> = Vec::new();
        for order in orders {
            if self.is_new(&order) && !new_orders.iter().any(|o| o.id == order.id) {
                new_orders.push(order);
            }
        }

        if new_orders.is_empty() {
            return (self, Vec::new());
        }

        let newest = new_orders.iter().map(|order| order.props.created_at).max();
        self.watermark = self.watermark.max(newest);

        self.pending.extend(new_orders);

        let mut effects = Vec::new();

        // an existing popup stays authoritative, new orders only extend the backlog
        if self.active_popup.is_none() {
            self.active_popup = self.pending.pop_front();
            effects.push(SideEffect::PlayNotification);
        }

        (self, effects)
    }

    fn on_acknowledged(mut self) -> (FeedState, Vec<SideEffect>) {
        let acknowledged = match self.active_popup.take() {
            None => return (self, Vec::new()),
            Some(order) => order,
        };

        let cursor = match self.cursor {
            Some(cursor) => cursor.max(acknowledged.props.created_at),
            None => acknowledged.props.created_at,
        };
        self.cursor = Some(cursor);

        let mut effects = vec![
            SideEffect::PrintTicket(acknowledged),
            SideEffect::PersistCursor(cursor),
        ];

        if let Some(next) = self.pending.pop_front() {
            self.active_popup = Some(next);
            effects.push(SideEffect::PlayNotification);
        }

        (self, effects)
    }

    fn on_dismissed(mut self) -> (FeedState, Vec<SideEffect>) {
        self.active_popup = None;
        (self, Vec::new())
    }
}
