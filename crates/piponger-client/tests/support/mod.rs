#![allow(dead_code)]

use piponger_client::{ClientError, StatusApi};
use piponger_model::{ActionResponse, Snapshot};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const MASTER_RUNNING: &str = include_str!("../fixtures/master_running.json");
pub const MASTER_FINISHED: &str = include_str!("../fixtures/master_finished.json");

/// Answers every call with the same canned data after `delay`. A missing
/// snapshot or action answer behaves like an unreachable server.
pub struct FakeApi {
    pub delay: Duration,
    pub snapshot: Option<&'static str>,
    pub action: Option<ActionResponse>,
    pub calls: AtomicUsize,
}

impl FakeApi {
    pub fn snapshot(json: &'static str, delay: Duration) -> Self {
        Self {
            delay,
            snapshot: Some(json),
            action: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            delay: Duration::ZERO,
            snapshot: None,
            action: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn action(result: &str, msg: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            snapshot: None,
            action: Some(ActionResponse {
                result: result.to_string(),
                msg: msg.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatusApi for FakeApi {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, ClientError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let snapshot = self.snapshot;
        async move {
            tokio::time::sleep(delay).await;
            match snapshot {
                Some(json) => Ok(Snapshot::from_json(json)?),
                None => Err(ClientError::Status(503)),
            }
        }
    }

    fn force_create_iteration(
        &self,
    ) -> impl Future<Output = Result<ActionResponse, ClientError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let action = self.action.clone();
        async move {
            tokio::time::sleep(delay).await;
            action.ok_or(ClientError::Status(503))
        }
    }
}
