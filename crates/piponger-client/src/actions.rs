use crate::api::{Artifact, StatusApi};
use crate::error::ClientError;
use crate::store::StatusStore;
use piponger_model::{ActionResponse, IterationId};
use piponger_view::{ActionGates, ActionKind, Gate};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const RETRY_LATER_MESSAGE: &str =
    "There was an error performing this request, please try again later";
pub const START_REQUESTED_HINT: &str = "A new iteration was requested";
pub const START_PENDING_HINT: &str = "Starting a new iteration...";

/// Blocking error surface shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

impl ErrorDialog {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ForceCreateCompletion {
    pub result: Result<ActionResponse, ClientError>,
}

/// Resolved target of an "open artifact" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub artifact: Artifact,
    pub id: IterationId,
}

impl ArtifactTarget {
    pub fn path(&self) -> String {
        self.artifact.path(&self.id)
    }
}

/// Gates user commands on the button state derived from the latest snapshot
/// and turns action results into dialogs.
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    gates: ActionGates,
    dialog: Option<ErrorDialog>,
    /// Start gate to restore if the in-flight force-create fails.
    pending_start: Option<Gate>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gates(&self) -> &ActionGates {
        &self.gates
    }

    /// Recomputes button state from the store. Called after each applied
    /// poll, which also clears the optimistic start-disable.
    pub fn reconcile(&mut self, store: &StatusStore) {
        let mut gates = ActionGates::for_snapshot(store.current());
        if self.pending_start.is_some() {
            self.pending_start = Some(gates.start);
            gates.start = Gate::disabled(START_PENDING_HINT);
        }
        self.gates = gates;
    }

    pub fn dialog(&self) -> Option<&ErrorDialog> {
        self.dialog.as_ref()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.dialog = Some(ErrorDialog::new(message));
    }

    pub fn dismiss_dialog(&mut self) -> bool {
        self.dialog.take().is_some()
    }

    /// An open dialog blocks every action, as does a disabled button.
    pub fn can_dispatch(&self, kind: ActionKind) -> bool {
        self.dialog.is_none() && self.gates.is_enabled(kind)
    }

    /// Claims the start action for one request. Returns `false` when it is
    /// disabled or a request is already in flight.
    pub fn begin_force_create(&mut self) -> bool {
        if !self.can_dispatch(ActionKind::StartIteration) {
            return false;
        }
        let start = std::mem::replace(&mut self.gates.start, Gate::disabled(START_PENDING_HINT));
        self.pending_start = Some(start);
        true
    }

    pub fn finish_force_create(&mut self, result: Result<ActionResponse, ClientError>) {
        if let Some(start) = self.pending_start.take() {
            self.gates.start = start;
        }
        match result {
            Ok(response) if response.is_success() => {
                info!(msg = %response.msg, "new iteration requested");
                self.gates.start = Gate::disabled(START_REQUESTED_HINT);
            }
            Ok(response) => {
                warn!(result = %response.result, msg = %response.msg, "force create rejected");
                self.show_error(response.msg);
            }
            Err(err) => {
                warn!(error = %err, "force create request failed");
                self.show_error(RETRY_LATER_MESSAGE);
            }
        }
    }

    /// Target for an artifact action, or `None` when the button is disabled
    /// or the latest snapshot carries no iteration id.
    pub fn resolve_artifact(
        &self,
        artifact: Artifact,
        store: &StatusStore,
    ) -> Option<ArtifactTarget> {
        if !self.can_dispatch(artifact.action()) {
            return None;
        }
        let id = store.current()?.current_iteration_id()?.clone();
        Some(ArtifactTarget { artifact, id })
    }
}

pub fn spawn_force_create<A: StatusApi>(
    api: Arc<A>,
    tx: UnboundedSender<ForceCreateCompletion>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = api.force_create_iteration().await;
        let _ = tx.send(ForceCreateCompletion { result });
    })
}
