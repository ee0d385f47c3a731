use crate::format::{elapsed_secs, format_duration, format_value, parse_timestamp, prepare_label};
use crate::gates::ActionGates;
use crate::table::{endpoint_rows, EndpointRow, ProgressView, Row};
use chrono::{DateTime, Utc};
use piponger_model::{CurrentIteration, MasterInfo, Progress};

pub const TIME_SINCE_CREATION: &str = "Time since creation";
const UNKNOWN_DURATION: &str = "--:--:--";
/// Row order for iterations built in code, which carry no key order.
const KNOWN_FIELDS: [&str; 5] = ["id", "status", "progress", "created_date", "has_graph"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRow {
    pub host: String,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterView {
    pub rows: Vec<Row>,
    pub progress: Option<ProgressView>,
    /// `None` hides the side table; it is never `Some` and empty.
    pub problematic_hosts: Option<Vec<HostRow>>,
    pub pingers: Vec<EndpointRow>,
    pub pongers: Vec<EndpointRow>,
    pub gates: ActionGates,
}

pub fn project_master(master: &MasterInfo, now: DateTime<Utc>) -> MasterView {
    let iteration = master.current_iteration.as_ref();

    MasterView {
        rows: iteration
            .map(|iteration| iteration_rows(iteration, now))
            .unwrap_or_default(),
        progress: iteration
            .and_then(|iteration| iteration.progress.as_ref())
            .map(progress_view),
        problematic_hosts: iteration.and_then(host_rows),
        pingers: endpoint_rows(&master.registered_pingers),
        pongers: endpoint_rows(&master.registered_pongers),
        gates: iteration.map(ActionGates::for_iteration).unwrap_or_default(),
    }
}

fn iteration_rows(iteration: &CurrentIteration, now: DateTime<Utc>) -> Vec<Row> {
    let mut rows = Vec::new();
    if iteration.field_order.is_empty() {
        let keys = KNOWN_FIELDS
            .into_iter()
            .chain(iteration.extra.keys().map(String::as_str));
        for key in keys {
            push_field(&mut rows, iteration, key, now);
        }
    } else {
        for key in &iteration.field_order {
            push_field(&mut rows, iteration, key, now);
        }
    }
    rows
}

fn push_field(rows: &mut Vec<Row>, iteration: &CurrentIteration, key: &str, now: DateTime<Utc>) {
    match key {
        "id" => {
            if let Some(id) = &iteration.id {
                rows.push(Row::new(prepare_label(key), id.to_string()));
            }
        }
        "status" => {
            if let Some(status) = iteration.status {
                rows.push(Row::new(prepare_label(key), status.as_str()));
            }
        }
        "progress" => {
            if let Some(progress) = &iteration.progress {
                rows.push(Row::new(
                    prepare_label(key),
                    format!("{}%", progress.percentage),
                ));
            }
        }
        "created_date" => {
            if let Some(created) = &iteration.created_date {
                rows.push(Row::new(prepare_label(key), created.clone()));
                let since = parse_timestamp(created)
                    .map(|created| format_duration(elapsed_secs(created, now)))
                    .unwrap_or_else(|| UNKNOWN_DURATION.to_string());
                rows.push(Row::new(TIME_SINCE_CREATION, since));
            }
        }
        "has_graph" => {
            if let Some(has_graph) = iteration.has_graph {
                rows.push(Row::new(prepare_label(key), has_graph.to_string()));
            }
        }
        // Side table, not a row.
        "problematic_hosts" => {}
        _ => {
            if let Some(value) = iteration.extra.get(key) {
                rows.push(Row::new(prepare_label(key), format_value(value)));
            }
        }
    }
}

fn progress_view(progress: &Progress) -> ProgressView {
    let percent = progress.percentage.clamp(0.0, 100.0).trunc() as u8;
    ProgressView::new(percent, format!("{}/{}", progress.count, progress.total))
}

fn host_rows(iteration: &CurrentIteration) -> Option<Vec<HostRow>> {
    if iteration.problematic_hosts.is_empty() {
        return None;
    }
    Some(
        iteration
            .problematic_hosts
            .iter()
            .map(|host| HostRow {
                host: host.host.clone(),
                score: format_value(&host.score),
            })
            .collect(),
    )
}
