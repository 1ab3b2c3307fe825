use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossbeam::channel::{self, select, Receiver, Sender};

use base::entities::order::OrderId;
use base::entities::{Order, OrderTimestamp};
use base::notifier::NotificationSink;
use base::stores::cursor_store::CursorStore;

use crate::api::OrderSource;
use crate::monitor::{OrderFeedMonitor, ShutdownSignal};
use crate::printers::PrintSink;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

const WORKER_THREAD_NAME: &str = "order-feed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Acknowledge,
    Dismiss,
    Print(OrderId),
}

/// What the operator sees. Published by the worker whenever it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub active_popup: Option<Order>,
    pub pending: usize,
    pub cursor: Option<OrderTimestamp>,
    pub visible_orders: Vec<Order>,
    pub print_failure: Option<String>,
}

impl<S, N, P, C> OrderFeedMonitor<S, N, P, C>
where
    S: OrderSource + Send + 'static,
    N: NotificationSink + Send + 'static,
    P: PrintSink + Send + 'static,
    C: CursorStore + Send + 'static,
{
    /// Moves the monitor onto its own worker thread and polls every `interval`.
    ///
    /// Operator commands and poll ticks are handled one at a time on that thread.
    pub fn start(self, interval: Duration) -> Result<MonitorHandle> {
        let (commands_sender, commands_receiver) = channel::unbounded();
        let (updates_sender, updates_receiver) = channel::unbounded();
        let (stop_sender, stop_receiver) = channel::bounded(1);

        let shutdown = self.shutdown_signal();
        let target_logger = self.target_logger().to_string();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                run_feed_loop(
                    self,
                    interval,
                    commands_receiver,
                    stop_receiver,
                    updates_sender,
                )
            })
            .context("failed to spawn the order feed worker")?;

        log::info!(
            target: target_logger.as_str(),
            "order feed started, polling every {:?}",
            interval
        );

        Ok(MonitorHandle {
            commands: commands_sender,
            updates: updates_receiver,
            stop: Some(stop_sender),
            shutdown,
            worker: Some(worker),
            target_logger,
        })
    }
}

fn snapshot<S, N, P, C>(
    monitor: &OrderFeedMonitor<S, N, P, C>,
    print_failure: Option<String>,
) -> FeedSnapshot
where
    S: OrderSource,
    N: NotificationSink,
    P: PrintSink,
    C: CursorStore,
{
    FeedSnapshot {
        active_popup: monitor.active_popup().cloned(),
        pending: monitor.pending_orders().len(),
        cursor: monitor.cursor(),
        visible_orders: monitor.visible_orders().to_vec(),
        print_failure,
    }
}

fn run_feed_loop<S, N, P, C>(
    mut monitor: OrderFeedMonitor<S, N, P, C>,
    interval: Duration,
    commands: Receiver<OperatorCommand>,
    stop: Receiver<()>,
    updates: Sender<FeedSnapshot>,
) where
    S: OrderSource,
    N: NotificationSink,
    P: PrintSink,
    C: CursorStore,
{
    let shutdown = monitor.shutdown_signal();
    let ticker = channel::tick(interval);
    let mut last_published: Option<FeedSnapshot> = None;

    let mut publish = |monitor: &OrderFeedMonitor<S, N, P, C>, print_failure: Option<String>| {
        // every print failure is reported, even a repeat of the previous one
        let is_failure = print_failure.is_some();
        let current = snapshot(monitor, print_failure);
        if is_failure || last_published.as_ref() != Some(&current) {
            // nobody listening is fine, the operator may have detached
            let _ = updates.send(current.clone());
            last_published = Some(current);
        }
    };

    monitor.poll();
    publish(&monitor, None);

    loop {
        let mut print_failure = None;

        select! {
            recv(stop) -> _ => break,
            recv(commands) -> command => match command {
                Ok(OperatorCommand::Acknowledge) => {
                    print_failure = monitor.acknowledge().map(|e| e.to_string());
                }
                Ok(OperatorCommand::Dismiss) => monitor.dismiss(),
                Ok(OperatorCommand::Print(order_id)) => {
                    print_failure = monitor
                        .manual_print_by_id(&order_id)
                        .err()
                        .map(|e| e.to_string());
                }
                Err(_) => break,
            },
            recv(ticker) -> _ => monitor.poll(),
        }

        if shutdown.is_triggered() {
            break;
        }

        publish(&monitor, print_failure);
    }

    monitor.release();
    log::info!(target: monitor.target_logger(), "order feed stopped");
}

/// Owner side of a running monitor. Dropping it stops the worker.
pub struct MonitorHandle {
    commands: Sender<OperatorCommand>,
    updates: Receiver<FeedSnapshot>,
    stop: Option<Sender<()>>,
    shutdown: ShutdownSignal,
    worker: Option<JoinHandle<()>>,
    target_logger: String,
}

impl MonitorHandle {
    pub fn send(&self, command: OperatorCommand) -> Result<()> {
        if !self.is_running() {
            return Err(anyhow!("the order feed is stopped"));
        }

        self.commands
            .send(command)
            .map_err(|_| anyhow!("the order feed is stopped"))
    }

    pub fn acknowledge(&self) -> Result<()> {
        self.send(OperatorCommand::Acknowledge)
    }

    pub fn dismiss(&self) -> Result<()> {
        self.send(OperatorCommand::Dismiss)
    }

    pub fn print(&self, order_id: &str) -> Result<()> {
        self.send(OperatorCommand::Print(order_id.to_string()))
    }

    pub fn updates(&self) -> Receiver<FeedSnapshot> {
        self.updates.clone()
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some() && !self.shutdown.is_triggered()
    }

    /// Stops polling and waits for the worker to exit. Safe to call more than once.
    pub fn stop(&mut self) {
        self.shutdown.trigger();

        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!(
                    target: self.target_logger.as_str(),
                    "the order feed worker panicked"
                );
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
