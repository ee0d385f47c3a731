use crate::api::StatusApi;
use crate::error::ClientError;
use crate::store::StatusStore;
use piponger_model::Snapshot;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(2500);
pub const DEFAULT_LOADING_FLOOR: Duration = Duration::from_millis(500);

/// Sequence number a poll request was issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollTicket {
    pub seq: u64,
}

#[derive(Debug)]
pub struct PollCompletion {
    pub ticket: PollTicket,
    pub result: Result<Snapshot, ClientError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    /// A newer poll was issued after this one; the response was dropped.
    Stale,
    Failed,
}

/// Visibility of the "refreshing" indicator.
///
/// Shown while any poll is in flight and for at least `floor` after the
/// last one completes.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    floor: Duration,
    in_flight: usize,
    hide_at: Option<Instant>,
}

impl LoadingIndicator {
    pub fn new(floor: Duration) -> Self {
        Self {
            floor,
            in_flight: 0,
            hide_at: None,
        }
    }

    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.hide_at = None;
    }

    pub fn finish(&mut self, now: Instant) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.hide_at = Some(now + self.floor);
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.in_flight > 0 || self.hide_at.is_some_and(|hide_at| now < hide_at)
    }
}

/// Issues sequence-tagged polls and applies only the most recently issued
/// one. Responses are never cancelled, only discarded.
#[derive(Debug, Clone)]
pub struct Poller {
    period: Duration,
    latest_issued: u64,
    loading: LoadingIndicator,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_PERIOD, DEFAULT_LOADING_FLOOR)
    }
}

impl Poller {
    pub fn new(period: Duration, loading_floor: Duration) -> Self {
        Self {
            period,
            latest_issued: 0,
            loading: LoadingIndicator::new(loading_floor),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn issue(&mut self) -> PollTicket {
        self.latest_issued += 1;
        self.loading.begin();
        PollTicket {
            seq: self.latest_issued,
        }
    }

    pub fn is_latest(&self, ticket: PollTicket) -> bool {
        ticket.seq == self.latest_issued
    }

    pub fn complete(
        &mut self,
        completion: PollCompletion,
        now: Instant,
        store: &mut StatusStore,
    ) -> PollOutcome {
        self.loading.finish(now);
        let seq = completion.ticket.seq;

        match completion.result {
            Err(err) => {
                debug!(seq, error = %err, "poll failed; keeping previous snapshot");
                PollOutcome::Failed
            }
            Ok(_) if !self.is_latest(completion.ticket) => {
                debug!(seq, latest = self.latest_issued, "dropping stale poll response");
                PollOutcome::Stale
            }
            Ok(snapshot) => {
                store.replace(snapshot);
                PollOutcome::Applied
            }
        }
    }

    pub fn loading_visible(&self, now: Instant) -> bool {
        self.loading.is_visible(now)
    }
}

/// Runs one fetch on the current runtime and reports back on `tx`.
pub fn spawn_poll<A: StatusApi>(
    api: Arc<A>,
    ticket: PollTicket,
    tx: UnboundedSender<PollCompletion>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = api.fetch_snapshot().await;
        let _ = tx.send(PollCompletion { ticket, result });
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(ticket: PollTicket, snapshot: Snapshot) -> PollCompletion {
        PollCompletion {
            ticket,
            result: Ok(snapshot),
        }
    }

    #[test]
    fn tickets_increase_monotonically() {
        let mut poller = Poller::default();
        let a = poller.issue();
        let b = poller.issue();
        assert!(a < b);
        assert!(!poller.is_latest(a));
        assert!(poller.is_latest(b));
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut poller = Poller::default();
        let mut store = StatusStore::new();
        let now = Instant::now();

        let first = poller.issue();
        assert_eq!(
            poller.complete(ok(first, Snapshot::default()), now, &mut store),
            PollOutcome::Applied
        );

        let second = poller.issue();
        let failed = PollCompletion {
            ticket: second,
            result: Err(ClientError::Status(502)),
        };
        assert_eq!(poller.complete(failed, now, &mut store), PollOutcome::Failed);
        assert_eq!(store.replacements(), 1);
        assert!(store.current().is_some());
    }

    #[test]
    fn loading_indicator_honors_floor() {
        let floor = Duration::from_millis(500);
        let mut loading = LoadingIndicator::new(floor);
        let start = Instant::now();
        assert!(!loading.is_visible(start));

        loading.begin();
        assert!(loading.is_visible(start));

        let done = start + Duration::from_millis(20);
        loading.finish(done);
        assert!(loading.is_visible(done + Duration::from_millis(499)));
        assert!(!loading.is_visible(done + floor));
    }

    #[test]
    fn loading_stays_up_while_any_poll_is_pending() {
        let mut loading = LoadingIndicator::new(Duration::from_millis(500));
        let now = Instant::now();
        loading.begin();
        loading.begin();
        loading.finish(now);
        assert!(loading.is_visible(now + Duration::from_secs(10)));
        loading.finish(now);
        assert!(!loading.is_visible(now + Duration::from_secs(1)));
    }
}
