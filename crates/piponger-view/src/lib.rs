//! Pure projections from a status snapshot to what the dashboard shows.

pub mod format;
pub mod gates;
pub mod master;
pub mod pinger;
pub mod ponger;
pub mod table;

pub use format::{elapsed_secs, format_duration, format_value, parse_timestamp, prepare_label};
pub use gates::{ActionGates, ActionKind, Gate};
pub use master::{project_master, HostRow, MasterView, TIME_SINCE_CREATION};
pub use pinger::{project_pinger, status_progress, PingerView};
pub use ponger::{project_ponger, PongerView, PortRow};
pub use table::{EndpointRow, ProgressView, Row};

use chrono::{DateTime, Utc};
use piponger_model::Snapshot;

/// Everything one frame of the dashboard needs from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardView {
    pub roles: Vec<&'static str>,
    pub master: Option<MasterView>,
    pub pinger: Option<PingerView>,
    pub ponger: Option<PongerView>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.master.is_none() && self.pinger.is_none() && self.ponger.is_none()
    }
}

pub fn project(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardView {
    DashboardView {
        roles: snapshot
            .capabilities
            .map(|capabilities| capabilities.roles())
            .unwrap_or_default(),
        master: snapshot
            .master_info
            .as_ref()
            .map(|master| project_master(master, now)),
        pinger: snapshot.pinger_info.as_ref().map(project_pinger),
        ponger: snapshot.ponger_info.as_ref().map(project_ponger),
    }
}
