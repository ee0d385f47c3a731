//! Shared data structures for the piponger status dashboard.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of discrete steps a pinger iteration moves through.
pub const STEP_COUNT: u8 = 5;

/// Full response of `GET /`. Every section is optional and depends on the
/// roles the node was started with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_info: Option<MasterInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinger_info: Option<PingerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ponger_info: Option<PongerInfo>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Id of the master's current iteration, if the snapshot carries one.
    pub fn current_iteration_id(&self) -> Option<&IterationId> {
        self.master_info
            .as_ref()?
            .current_iteration
            .as_ref()?
            .id
            .as_ref()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    #[serde(default)]
    pub is_pinger: bool,
    #[serde(default)]
    pub is_ponger: bool,
    #[serde(default)]
    pub is_master: bool,
}

impl Capabilities {
    pub fn roles(&self) -> Vec<&'static str> {
        let mut roles = Vec::new();
        if self.is_master {
            roles.push("master");
        }
        if self.is_pinger {
            roles.push("pinger");
        }
        if self.is_ponger {
            roles.push("ponger");
        }
        roles
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MasterInfo {
    #[serde(
        default,
        alias = "last_iteration_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_iteration: Option<CurrentIteration>,
    #[serde(default, alias = "registrered_pingers")]
    pub registered_pingers: Vec<NodeEndpoint>,
    #[serde(default, alias = "registrered_pongers")]
    pub registered_pongers: Vec<NodeEndpoint>,
}

/// The master's view of the iteration in progress.
///
/// Known fields are typed; anything else the server adds is kept in
/// `extra`. `field_order` records every key in the order it was received,
/// known ones included, and is empty for values built in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct CurrentIteration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<IterationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IterationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    pub problematic_hosts: Vec<ProblematicHost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_graph: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub field_order: Vec<String>,
}

impl TryFrom<Map<String, Value>> for CurrentIteration {
    type Error = serde_json::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut iteration = CurrentIteration {
            field_order: fields.keys().cloned().collect(),
            ..CurrentIteration::default()
        };

        for (key, value) in fields {
            match key.as_str() {
                "id" => iteration.id = nullable(value)?,
                "status" => iteration.status = nullable(value)?,
                "progress" => iteration.progress = nullable(value)?,
                "created_date" => iteration.created_date = nullable(value)?,
                "problematic_hosts" => {
                    iteration.problematic_hosts = nullable(value)?.unwrap_or_default()
                }
                "has_graph" => iteration.has_graph = nullable(value)?,
                _ => {
                    iteration.extra.insert(key, value);
                }
            }
        }

        Ok(iteration)
    }
}

fn nullable<T: DeserializeOwned>(value: Value) -> Result<Option<T>, serde_json::Error> {
    serde_json::from_value(value)
}

/// Iteration ids are integers on the reference server but are treated as
/// opaque path segments here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum IterationId {
    Number(u64),
    Text(String),
}

impl fmt::Display for IterationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationId::Number(value) => write!(f, "{value}"),
            IterationId::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Progress {
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
}

/// `score` is a SQL numeric on the server and may arrive as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblematicHost {
    pub host: String,
    #[serde(default)]
    pub score: Value,
}

/// Roster entry. Ports are nullable columns server side, so they are kept
/// as raw JSON for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeEndpoint {
    pub address: String,
    #[serde(default)]
    pub api_port: Value,
    pub api_protocol: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PingerInfo {
    /// Field name to value, in server order. Empty until the pinger has run
    /// its first iteration.
    #[serde(default)]
    pub last_iteration_status: Map<String, Value>,
    #[serde(default)]
    pub ponger_list: Vec<NodeEndpoint>,
}

impl PingerInfo {
    /// Parsed `status` field; `None` when absent or not a known status.
    pub fn status(&self) -> Option<IterationStatus> {
        self.last_iteration_status
            .get("status")
            .and_then(Value::as_str)
            .and_then(|value| value.parse().ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PongerInfo {
    #[serde(default)]
    pub pinger_port_list: Vec<AllocatedPort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocatedPort {
    pub address: String,
    #[serde(default)]
    pub port: Value,
}

/// Lifecycle of an iteration, shared by master and pinger.
///
/// Variants are declared in progress order, so `Ord` follows the lifecycle.
/// `Error` is terminal and reports the same progress as `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IterationStatus {
    Created,
    Running,
    RunningTraceroute,
    RunningIperf,
    RunningFinishing,
    Finished,
    Error,
}

impl IterationStatus {
    pub const ALL: [IterationStatus; 7] = [
        IterationStatus::Created,
        IterationStatus::Running,
        IterationStatus::RunningTraceroute,
        IterationStatus::RunningIperf,
        IterationStatus::RunningFinishing,
        IterationStatus::Finished,
        IterationStatus::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IterationStatus::Created => "CREATED",
            IterationStatus::Running => "RUNNING",
            IterationStatus::RunningTraceroute => "RUNNING_TRACEROUTE",
            IterationStatus::RunningIperf => "RUNNING_IPERF",
            IterationStatus::RunningFinishing => "RUNNING_FINISHING",
            IterationStatus::Finished => "FINISHED",
            IterationStatus::Error => "ERROR",
        }
    }

    /// Percentage shown on the pinger progress bar.
    pub fn percentage(self) -> u8 {
        match self {
            IterationStatus::Created => 1,
            IterationStatus::Running => 10,
            IterationStatus::RunningTraceroute => 40,
            IterationStatus::RunningIperf => 70,
            IterationStatus::RunningFinishing => 90,
            IterationStatus::Finished | IterationStatus::Error => 100,
        }
    }

    /// Step index in `0..=STEP_COUNT`.
    pub fn step(self) -> u8 {
        match self {
            IterationStatus::Created => 0,
            IterationStatus::Running => 1,
            IterationStatus::RunningTraceroute => 2,
            IterationStatus::RunningIperf => 3,
            IterationStatus::RunningFinishing => 4,
            IterationStatus::Finished | IterationStatus::Error => STEP_COUNT,
        }
    }
}

impl fmt::Display for IterationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown iteration status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for IterationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        IterationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Body of the JSON action endpoints, e.g. `GET /force_create_iteration`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResponse {
    pub result: String,
    #[serde(default)]
    pub msg: String,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}
