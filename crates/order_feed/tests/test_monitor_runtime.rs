mod common;

use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::Receiver;

use common::*;
use order_feed::FeedSnapshot;

const TEST_POLL_INTERVAL: Duration = Duration::from_millis(10);
const WAIT_LIMIT: Duration = Duration::from_secs(5);

fn wait_for<F>(updates: &Receiver<FeedSnapshot>, predicate: F) -> FeedSnapshot
where
    F: Fn(&FeedSnapshot) -> bool,
{
    let deadline = Instant::now() + WAIT_LIMIT;

    loop {
        let left = deadline
            .checked_duration_since(Instant::now())
            .expect("timed out waiting for a feed snapshot");

        let snapshot = updates
            .recv_timeout(left)
            .expect("timed out waiting for a feed snapshot");

        if predicate(&snapshot) {
            return snapshot;
        }
    }
}

#[test]
#[allow(non_snake_case)]
fn start__new_order__should_publish_popup_and_handle_acknowledge() {
    let fakes = Fakes::default();
    fakes.source.set_listing(vec![order("O1", 10)]);

    let mut handle = monitor(&fakes).start(TEST_POLL_INTERVAL).unwrap();
    let updates = handle.updates();

    let snapshot = wait_for(&updates, |snapshot| snapshot.active_popup.is_some());
    assert_eq!(snapshot.active_popup.unwrap().id, "O1");
    assert_eq!(snapshot.visible_orders.len(), 1);

    handle.acknowledge().unwrap();

    let snapshot = wait_for(&updates, |snapshot| snapshot.active_popup.is_none());
    assert_eq!(snapshot.cursor, Some(at(10)));
    assert_eq!(snapshot.print_failure, None);
    assert_eq!(fakes.printer.printed_ids(), vec!["O1"]);
    assert_eq!(fakes.cursor_store.value(), Some(at(10)));

    handle.stop();
}

#[test]
#[allow(non_snake_case)]
fn start__order_added_later__should_be_picked_up_by_next_tick() {
    let fakes = Fakes::default();
    let mut handle = monitor(&fakes).start(TEST_POLL_INTERVAL).unwrap();
    let updates = handle.updates();

    fakes.source.set_listing(vec![order("O7", 70)]);

    let snapshot = wait_for(&updates, |snapshot| snapshot.active_popup.is_some());
    assert_eq!(snapshot.active_popup.unwrap().id, "O7");
    assert_eq!(fakes.notifier.plays(), 1);

    handle.stop();
}

#[test]
#[allow(non_snake_case)]
fn print__failing_printer__should_publish_failure() {
    let fakes = Fakes {
        printer: RecordingPrinter::failing(),
        ..Default::default()
    };
    fakes.source.set_listing(vec![order("O1", 10)]);

    let mut handle = monitor(&fakes).start(TEST_POLL_INTERVAL).unwrap();
    let updates = handle.updates();
    wait_for(&updates, |snapshot| !snapshot.visible_orders.is_empty());

    handle.print("O1").unwrap();

    let snapshot = wait_for(&updates, |snapshot| snapshot.print_failure.is_some());
    assert!(snapshot.print_failure.unwrap().contains("O1"));
    // manual printing leaves the workflow alone
    assert_eq!(snapshot.active_popup.unwrap().id, "O1");
    assert!(fakes.cursor_store.history().is_empty());

    handle.stop();
}

#[test]
#[allow(non_snake_case)]
fn stop__running_monitor__should_stop_polling_and_release_once() {
    let fakes = Fakes::default();
    fakes.source.set_listing(vec![order("O1", 10)]);

    let mut handle = monitor(&fakes).start(TEST_POLL_INTERVAL).unwrap();
    let updates = handle.updates();
    wait_for(&updates, |snapshot| snapshot.active_popup.is_some());
    assert!(handle.is_running());

    handle.stop();
    handle.stop();

    let fetches_after_stop = fakes.source.fetches();
    thread::sleep(TEST_POLL_INTERVAL * 5);

    assert!(!handle.is_running());
    assert_eq!(fakes.source.fetches(), fetches_after_stop);
    assert_eq!(fakes.notifier.releases(), 1);
    assert!(handle.acknowledge().is_err());
    assert!(fakes.printer.printed_ids().is_empty());
}

#[test]
#[allow(non_snake_case)]
fn drop__running_monitor__should_stop_worker() {
    let fakes = Fakes::default();
    let handle = monitor(&fakes).start(TEST_POLL_INTERVAL).unwrap();
    let updates = handle.updates();
    wait_for(&updates, |_| true);

    drop(handle);

    assert_eq!(fakes.notifier.releases(), 1);
}

#[test]
#[allow(non_snake_case)]
fn print__same_failure_twice_between_ticks__should_publish_both_failures() {
    let fakes = Fakes {
        printer: RecordingPrinter::failing(),
        ..Default::default()
    };
    fakes.source.set_listing(vec![order("O1", 10)]);

    let mut handle = monitor(&fakes).start(Duration::from_secs(3600)).unwrap();
    let updates = handle.updates();
    wait_for(&updates, |snapshot| snapshot.active_popup.is_some());

    handle.print("O1").unwrap();
    let first = wait_for(&updates, |snapshot| snapshot.print_failure.is_some());

    handle.print("O1").unwrap();
    let second = wait_for(&updates, |snapshot| snapshot.print_failure.is_some());

    assert_eq!(first, second);
    assert_eq!(fakes.printer.printed_ids(), vec!["O1", "O1"]);
    assert_eq!(fakes.source.fetches(), 1);

    handle.stop();
}

#[test]
#[allow(non_snake_case)]
fn dismiss__sent_while_fetch_in_flight__should_apply_after_fetch_and_stay_dismissed() {
    let fakes = Fakes::default();
    fakes.source.set_listing(vec![order("O1", 10), order("O2", 20)]);

    let mut handle = monitor(&fakes).start(TEST_POLL_INTERVAL).unwrap();
    let updates = handle.updates();
    wait_for(&updates, |snapshot| snapshot.active_popup.is_some());

    let gate = fakes.source.block_next_fetch();
    gate.entered.recv_timeout(WAIT_LIMIT).unwrap();

    handle.dismiss().unwrap();
    gate.release.send(()).unwrap();

    let snapshot = wait_for(&updates, |snapshot| snapshot.active_popup.is_none());
    assert_eq!(snapshot.pending, 1);

    // later polls of the same listing do not bring the popup back
    let fetches = fakes.source.fetches();
    while fakes.source.fetches() < fetches + 3 {
        thread::sleep(TEST_POLL_INTERVAL);
    }

    assert!(updates.try_iter().all(|snapshot| snapshot.active_popup.is_none()));
    assert_eq!(fakes.notifier.plays(), 1);
    assert!(fakes.printer.printed_ids().is_empty());

    handle.stop();
}
