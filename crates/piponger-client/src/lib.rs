//! Snapshot polling, state keeping and action dispatch for the piponger
//! dashboard.

pub mod actions;
pub mod api;
pub mod error;
pub mod poller;
pub mod store;

pub use actions::{
    spawn_force_create, ActionDispatcher, ArtifactTarget, ErrorDialog, ForceCreateCompletion,
    RETRY_LATER_MESSAGE, START_PENDING_HINT, START_REQUESTED_HINT,
};
pub use api::{Artifact, HttpStatusApi, StatusApi, FORCE_CREATE_PATH, SNAPSHOT_PATH};
pub use error::ClientError;
pub use poller::{
    spawn_poll, LoadingIndicator, PollCompletion, PollOutcome, PollTicket, Poller,
    DEFAULT_LOADING_FLOOR, DEFAULT_POLL_PERIOD,
};
pub use store::StatusStore;
