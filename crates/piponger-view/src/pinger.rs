use crate::format::{format_value, prepare_label};
use crate::table::{endpoint_rows, EndpointRow, ProgressView, Row};
use piponger_model::{IterationStatus, PingerInfo, STEP_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingerView {
    pub rows: Vec<Row>,
    /// Absent until the last iteration reports a known status.
    pub progress: Option<ProgressView>,
    pub pongers: Vec<EndpointRow>,
}

pub fn project_pinger(info: &PingerInfo) -> PingerView {
    let rows = info
        .last_iteration_status
        .iter()
        .map(|(key, value)| Row::new(prepare_label(key), format_value(value)))
        .collect();

    PingerView {
        rows,
        progress: info.status().map(status_progress),
        pongers: endpoint_rows(&info.ponger_list),
    }
}

pub fn status_progress(status: IterationStatus) -> ProgressView {
    ProgressView::new(
        status.percentage(),
        format!("{}/{}", status.step(), STEP_COUNT),
    )
}
