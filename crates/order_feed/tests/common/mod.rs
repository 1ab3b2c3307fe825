#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use crossbeam::channel::{self, Receiver, Sender};
use rust_decimal_macros::dec;

use base::entities::{Item, Order, OrderLine, OrderProperties, OrderTimestamp};
use base::notifier::NotificationSink;
use base::stores::cursor_store::CursorStore;
use order_feed::monitor::ShutdownSignal;
use order_feed::tickets::RenderedTicket;
use order_feed::{FetchError, OrderSource, PrintError, PrintSink};

pub fn at(secs: i64) -> OrderTimestamp {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn order(id: &str, secs: i64) -> Order {
    Item {
        id: id.to_string(),
        props: OrderProperties {
            table_number: 4,
            lines: vec![OrderLine {
                name: String::from("Chole Bhature"),
                quantity: 2,
                unit_price: dec!(110),
            }],
            total: dec!(220),
            created_at: at(secs),
        },
    }
}

pub type FetchResult = Result<Vec<Order>, FetchError>;

/// Replays scripted responses, then keeps answering with the last successful listing.
#[derive(Clone, Default)]
pub struct ScriptedOrderSource {
    script: Arc<Mutex<VecDeque<FetchResult>>>,
    current: Arc<Mutex<Vec<Order>>>,
    fetches: Arc<AtomicUsize>,
    stop_during_fetch: Arc<Mutex<Option<ShutdownSignal>>>,
    gate: Arc<Mutex<Option<(Sender<()>, Receiver<()>)>>>,
}

/// Holds one fetch in flight until `release` is sent.
pub struct FetchGate {
    pub entered: Receiver<()>,
    pub release: Sender<()>,
}

impl ScriptedOrderSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&self, response: FetchResult) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn set_listing(&self, orders: Vec<Order>) {
        *self.current.lock().unwrap() = orders;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Triggers the given signal from inside the next fetches, as if stop raced the request.
    pub fn stop_during_fetch(&self, signal: ShutdownSignal) {
        *self.stop_during_fetch.lock().unwrap() = Some(signal);
    }

    /// Makes the next fetch report itself on `entered` and wait for `release`.
    pub fn block_next_fetch(&self) -> FetchGate {
        let (entered_sender, entered_receiver) = channel::bounded(1);
        let (release_sender, release_receiver) = channel::bounded(1);
        *self.gate.lock().unwrap() = Some((entered_sender, release_receiver));

        FetchGate {
            entered: entered_receiver,
            release: release_sender,
        }
    }
}

impl OrderSource for ScriptedOrderSource {
    fn fetch_orders(&self) -> FetchResult {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }

        if let Some(signal) = self.stop_during_fetch.lock().unwrap().as_ref() {
            signal.trigger();
        }

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(orders)) => {
                *self.current.lock().unwrap() = orders.clone();
                Ok(orders)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.current.lock().unwrap().clone()),
        }
    }
}

#[derive(Clone, Default)]
pub struct CountingNotifier {
    plays: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    failing: bool,
}

impl CountingNotifier {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl NotificationSink for CountingNotifier {
    fn play(&self) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            bail!("audio device is busy");
        }

        Ok(())
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
pub struct RecordingPrinter {
    tickets: Arc<Mutex<Vec<RenderedTicket>>>,
    failing: bool,
}

impl RecordingPrinter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn printed_ids(&self) -> Vec<String> {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .map(|ticket| ticket.order_id.clone())
            .collect()
    }
}

impl PrintSink for RecordingPrinter {
    fn print(&self, ticket: &RenderedTicket) -> Result<(), PrintError> {
        self.tickets.lock().unwrap().push(ticket.clone());

        if self.failing {
            return Err(PrintError::Spool {
                order_id: ticket.order_id.clone(),
                source: io::Error::new(io::ErrorKind::Other, "out of paper"),
            });
        }

        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SharedCursorStore {
    value: Arc<Mutex<Option<OrderTimestamp>>>,
    history: Arc<Mutex<Vec<OrderTimestamp>>>,
    failing: bool,
}

impl SharedCursorStore {
    pub fn new(value: Option<OrderTimestamp>) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn value(&self) -> Option<OrderTimestamp> {
        *self.value.lock().unwrap()
    }

    pub fn history(&self) -> Vec<OrderTimestamp> {
        self.history.lock().unwrap().clone()
    }
}

impl CursorStore for SharedCursorStore {
    fn get(&self) -> Result<Option<OrderTimestamp>> {
        Ok(*self.value.lock().unwrap())
    }

    fn set(&mut self, timestamp: OrderTimestamp) -> Result<()> {
        if self.failing {
            bail!("disk is full");
        }

        *self.value.lock().unwrap() = Some(timestamp);
        self.history.lock().unwrap().push(timestamp);
        Ok(())
    }
}

pub struct Fakes {
    pub source: ScriptedOrderSource,
    pub notifier: CountingNotifier,
    pub printer: RecordingPrinter,
    pub cursor_store: SharedCursorStore,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            source: ScriptedOrderSource::new(),
            notifier: CountingNotifier::new(),
            printer: RecordingPrinter::new(),
            cursor_store: SharedCursorStore::new(None),
        }
    }
}

pub type FakeMonitor = order_feed::OrderFeedMonitor<
    ScriptedOrderSource,
    CountingNotifier,
    RecordingPrinter,
    SharedCursorStore,
>;

pub fn monitor(fakes: &Fakes) -> FakeMonitor {
    order_feed::OrderFeedMonitor::new(
        order_feed::FeedCollaborators {
            source: fakes.source.clone(),
            notifier: fakes.notifier.clone(),
            printer: fakes.printer.clone(),
            cursor_store: fakes.cursor_store.clone(),
        },
        "test",
    )
    .unwrap()
}
