use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;

use base::entities::{Order, OrderTimestamp};
use base::notifier::NotificationSink;
use base::stores::cursor_store::CursorStore;

use crate::api::OrderSource;
use crate::errors::PrintError;
use crate::feed_state::{FeedEvent, FeedPhase, FeedState, SideEffect};
use crate::pending_queue::PendingQueue;
use crate::printers::PrintSink;
use crate::tickets::render_kitchen_ticket;

/// Set once the monitor is stopped. A fetch that completes afterwards is discarded.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FeedCollaborators<S, N, P, C> {
    pub source: S,
    pub notifier: N,
    pub printer: P,
    pub cursor_store: C,
}

/// Drives the new-order workflow: polls the source, shows one order at a time,
/// prints and advances the cursor on acknowledgment.
///
/// Transitions are computed by [`FeedState::transition`]; this type only executes the
/// resulting side effects against its collaborators. Side-effect failures are logged and
/// never roll a transition back.
pub struct OrderFeedMonitor<S, N, P, C>
where
    S: OrderSource,
    N: NotificationSink,
    P: PrintSink,
    C: CursorStore,
{
    state: FeedState,
    listing: Vec<Order>,
    source: S,
    notifier: N,
    printer: P,
    cursor_store: C,
    target_logger: String,
    shutdown: ShutdownSignal,
}

impl<S, N, P, C> OrderFeedMonitor<S, N, P, C>
where
    S: OrderSource,
    N: NotificationSink,
    P: PrintSink,
    C: CursorStore,
{
    /// Reads the persisted cursor once to seed the feed state.
    pub fn new(collaborators: FeedCollaborators<S, N, P, C>, target_logger: &str) -> Result<Self> {
        let cursor = collaborators
            .cursor_store
            .get()
            .context("failed to read the last acknowledged order timestamp")?;

        match cursor {
            Some(cursor) => log::info!(
                target: target_logger,
                "resuming the order feed after {}",
                cursor
            ),
            None => log::info!(
                target: target_logger,
                "no acknowledged orders yet, every listed order is new"
            ),
        }

        Ok(Self {
            state: FeedState::new(cursor),
            listing: Vec::new(),
            source: collaborators.source,
            notifier: collaborators.notifier,
            printer: collaborators.printer,
            cursor_store: collaborators.cursor_store,
            target_logger: target_logger.to_string(),
            shutdown: ShutdownSignal::new(),
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn target_logger(&self) -> &str {
        &self.target_logger
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn phase(&self) -> FeedPhase {
        self.state.phase()
    }

    pub fn active_popup(&self) -> Option<&Order> {
        self.state.active_popup()
    }

    pub fn pending_orders(&self) -> &PendingQueue {
        self.state.pending()
    }

    pub fn cursor(&self) -> Option<OrderTimestamp> {
        self.state.cursor()
    }

    pub fn watermark(&self) -> Option<OrderTimestamp> {
        self.state.watermark()
    }

    /// The latest successfully fetched listing, in source order.
    pub fn visible_orders(&self) -> &[Order] {
        &self.listing
    }

    /// Fetches the listing and queues the orders not seen yet.
    ///
    /// Never fails: a fetch error is logged and the next poll simply tries again.
    pub fn poll(&mut self) {
        let orders = match self.source.fetch_orders() {
            Ok(orders) => orders,
            Err(e) => {
                log::error!(target: self.target_logger.as_str(), "error fetching orders: {}", e);
                return;
            }
        };

        if self.shutdown.is_triggered() {
            log::debug!(
                target: self.target_logger.as_str(),
                "the monitor is stopped, dropping {} fetched orders",
                orders.len()
            );
            return;
        }

        log::trace!(target: self.target_logger.as_str(), "fetched {} orders", orders.len());

        self.listing = orders.clone();
        self.apply(FeedEvent::OrdersFetched(orders));
    }

    /// Prints the displayed order, persists the cursor and shows the next queued order.
    ///
    /// Returns the print failure, if any, so that it can be shown to the operator.
    /// The transition completes either way.
    pub fn acknowledge(&mut self) -> Option<PrintError> {
        if self.phase() == FeedPhase::Idle {
            log::debug!(target: self.target_logger.as_str(), "nothing to acknowledge");
            return None;
        }

        self.apply(FeedEvent::Acknowledged)
    }

    /// Closes the popup without printing. The backlog is kept.
    pub fn dismiss(&mut self) {
        if let Some(order) = self.state.active_popup() {
            log::info!(
                target: self.target_logger.as_str(),
                "order {} dismissed without printing",
                order.id
            );
        }

        self.apply(FeedEvent::Dismissed);
    }

    pub fn manual_print(&self, order: &Order) -> Result<(), PrintError> {
        self.print_order(order)
    }

    pub fn manual_print_by_id(&self, order_id: &str) -> Result<(), PrintError> {
        let order = self
            .listing
            .iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| PrintError::UnknownOrder(order_id.to_string()))?;

        self.print_order(order)
    }

    /// Frees the notification sink. Called once when the monitor stops.
    pub fn release(&self) {
        self.notifier.release();
    }

    fn apply(&mut self, event: FeedEvent) -> Option<PrintError> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = state.transition(event);
        self.state = state;

        self.execute(effects)
    }

    fn execute(&mut self, effects: Vec<SideEffect>) -> Option<PrintError> {
        let mut print_failure = None;

        for effect in effects {
            match effect {
                SideEffect::PlayNotification => {
                    if let Some(order) = self.state.active_popup() {
                        log::info!(
                            target: self.target_logger.as_str(),
                            "new order {} from table {}, {} more waiting",
                            order.id,
                            order.props.table_number,
                            self.state.pending().len()
                        );
                    }

                    if let Err(e) = self.notifier.play() {
                        log::warn!(
                            target: self.target_logger.as_str(),
                            "failed to play the new order notification: {:#}",
                            e
                        );
                    }
                }
                SideEffect::PrintTicket(order) => {
                    if let Err(e) = self.print_order(&order) {
                        print_failure = Some(e);
                    }
                }
                SideEffect::PersistCursor(cursor) => {
                    if let Err(e) = self.cursor_store.set(cursor) {
                        log::error!(
                            target: self.target_logger.as_str(),
                            "failed to persist the acknowledged cursor {}: {:#}",
                            cursor,
                            e
                        );
                    }
                }
            }
        }

        print_failure
    }

    fn print_order(&self, order: &Order) -> Result<(), PrintError> {
        let ticket = render_kitchen_ticket(order, &Local::now());

        match self.printer.print(&ticket) {
            Ok(()) => {
                log::info!(
                    target: self.target_logger.as_str(),
                    "printed the kitchen ticket of the order {}",
                    order.id
                );
                Ok(())
            }
            Err(e) => {
                log::error!(target: self.target_logger.as_str(), "print error: {}", e);
                Err(e)
            }
        }
    }
}
