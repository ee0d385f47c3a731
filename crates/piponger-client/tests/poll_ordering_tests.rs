mod support;

use piponger_client::{spawn_poll, PollOutcome, Poller, StatusStore};
use piponger_model::{IterationId, IterationStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use support::{FakeApi, MASTER_FINISHED, MASTER_RUNNING};
use tokio::sync::mpsc::unbounded_channel;

fn current_status(store: &StatusStore) -> Option<IterationStatus> {
    store
        .current()?
        .master_info
        .as_ref()?
        .current_iteration
        .as_ref()?
        .status
}

#[tokio::test]
async fn older_poll_arriving_late_is_discarded() {
    let slow = Arc::new(FakeApi::snapshot(MASTER_RUNNING, Duration::from_millis(80)));
    let fast = Arc::new(FakeApi::snapshot(MASTER_FINISHED, Duration::ZERO));
    let (tx, mut rx) = unbounded_channel();
    let mut poller = Poller::default();
    let mut store = StatusStore::new();

    let a = poller.issue();
    spawn_poll(slow, a, tx.clone());
    let b = poller.issue();
    spawn_poll(fast, b, tx.clone());

    let first = rx.recv().await.unwrap();
    assert_eq!(first.ticket, b);
    assert_eq!(
        poller.complete(first, Instant::now(), &mut store),
        PollOutcome::Applied
    );

    let second = rx.recv().await.unwrap();
    assert_eq!(second.ticket, a);
    assert_eq!(
        poller.complete(second, Instant::now(), &mut store),
        PollOutcome::Stale
    );

    assert_eq!(current_status(&store), Some(IterationStatus::Finished));
    assert_eq!(
        store.current().and_then(|s| s.current_iteration_id()),
        Some(&IterationId::Number(12))
    );
    assert_eq!(store.replacements(), 1);
}

#[tokio::test]
async fn sequential_polls_replace_wholesale() {
    let running = Arc::new(FakeApi::snapshot(MASTER_RUNNING, Duration::ZERO));
    let finished = Arc::new(FakeApi::snapshot(MASTER_FINISHED, Duration::ZERO));
    let (tx, mut rx) = unbounded_channel();
    let mut poller = Poller::default();
    let mut store = StatusStore::new();

    spawn_poll(finished.clone(), poller.issue(), tx.clone());
    let completion = rx.recv().await.unwrap();
    poller.complete(completion, Instant::now(), &mut store);
    assert_eq!(current_status(&store), Some(IterationStatus::Finished));

    spawn_poll(running.clone(), poller.issue(), tx.clone());
    let completion = rx.recv().await.unwrap();
    poller.complete(completion, Instant::now(), &mut store);
    assert_eq!(current_status(&store), Some(IterationStatus::Running));

    let iteration = store
        .current()
        .and_then(|s| s.master_info.as_ref())
        .and_then(|m| m.current_iteration.as_ref())
        .unwrap();
    assert!(iteration.problematic_hosts.is_empty());
    assert!(iteration.created_date.is_none());
    assert_eq!(finished.calls(), 1);
    assert_eq!(running.calls(), 1);
}

#[tokio::test]
async fn unreachable_server_is_silent_and_self_healing() {
    let down = Arc::new(FakeApi::unreachable());
    let up = Arc::new(FakeApi::snapshot(MASTER_RUNNING, Duration::ZERO));
    let (tx, mut rx) = unbounded_channel();
    let mut poller = Poller::new(Duration::from_millis(10), Duration::from_millis(500));
    let mut store = StatusStore::new();

    spawn_poll(down, poller.issue(), tx.clone());
    let completion = rx.recv().await.unwrap();
    let finished_at = Instant::now();
    assert_eq!(
        poller.complete(completion, finished_at, &mut store),
        PollOutcome::Failed
    );
    assert!(store.current().is_none());
    assert!(poller.loading_visible(finished_at));
    assert!(!poller.loading_visible(finished_at + Duration::from_millis(500)));

    spawn_poll(up, poller.issue(), tx.clone());
    let completion = rx.recv().await.unwrap();
    assert_eq!(
        poller.complete(completion, Instant::now(), &mut store),
        PollOutcome::Applied
    );
    assert_eq!(current_status(&store), Some(IterationStatus::Running));
}
