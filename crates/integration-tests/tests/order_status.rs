//! Status machine rules and timed progression.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use campus_eats_core::{OrderProgress, OrderStatus, TransitionError};
use campus_eats_storefront::tracking::OrderTracker;

const ALL: [OrderStatus; 6] = [
    OrderStatus::Received,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

fn rank(status: OrderStatus) -> usize {
    OrderStatus::FORWARD
        .iter()
        .position(|s| *s == status)
        .unwrap_or(usize::MAX)
}

#[test]
fn test_every_transition_pair() {
    for from in ALL {
        for to in ALL {
            let mut progress = OrderProgress::new(from);
            let result = progress.advance_to(to);

            let allowed = !from.is_terminal()
                && (to == OrderStatus::Cancelled || rank(to) == rank(from) + 1);
            assert_eq!(result.is_ok(), allowed, "{from} -> {to}");

            if allowed {
                assert_eq!(progress.status, to);
            } else {
                assert_eq!(progress.status, from, "{from} changed on refused {to}");
            }
        }
    }
}

#[test]
fn test_progress_never_decreases_along_forward_path() {
    let mut progress = OrderProgress::new(OrderStatus::Received);
    let mut last = progress.progress;
    while progress.advance().is_ok() {
        assert!(progress.progress > last);
        last = progress.progress;
    }
    assert_eq!(progress.status, OrderStatus::Delivered);
    assert_eq!(progress.progress, 100);
}

#[test]
fn test_terminal_statuses_refuse_everything() {
    for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        let mut progress = OrderProgress::new(terminal);
        assert_eq!(
            progress.cancel(),
            Err(TransitionError::Terminal(terminal))
        );
        assert!(progress.advance().is_err());
    }
}

#[test]
fn test_wire_names_round_trip_with_alias() {
    let ready: OrderStatus = serde_json::from_str("\"READY_FOR_PICKUP\"").unwrap();
    assert_eq!(ready, OrderStatus::Ready);
    assert_eq!(serde_json::to_string(&ready).unwrap(), "\"READY\"");
}

#[tokio::test(start_paused = true)]
async fn test_tracker_walks_to_out_for_delivery_and_stops() {
    let dwell = Duration::from_secs(5);
    let tracker = OrderTracker::start(OrderProgress::new(OrderStatus::Received), dwell);
    let mut updates = tracker.subscribe();

    let mut seen = vec![updates.borrow_and_update().status];
    while seen.last() != Some(&OrderStatus::OutForDelivery) {
        updates.changed().await.unwrap();
        seen.push(updates.borrow_and_update().status);
    }
    assert_eq!(
        seen,
        [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
        ]
    );

    tokio::time::sleep(dwell * 10).await;
    assert_eq!(tracker.snapshot().status, OrderStatus::OutForDelivery);

    let delivered = tracker.confirm_delivery().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.progress, 100);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_tracker_freezes_progress() {
    let dwell = Duration::from_secs(5);
    let tracker = OrderTracker::start(OrderProgress::new(OrderStatus::Preparing), dwell);

    tokio::time::sleep(dwell + Duration::from_millis(10)).await;
    assert_eq!(tracker.snapshot().status, OrderStatus::Ready);

    let cancelled = tracker.cancel().unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.progress, 50);

    tokio::time::sleep(dwell * 4).await;
    assert_eq!(tracker.snapshot(), cancelled);
    assert!(tracker.confirm_delivery().is_err());
}
