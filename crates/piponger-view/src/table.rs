use crate::format::format_value;
use piponger_model::NodeEndpoint;

/// One label/value line of a status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub value: String,
}

impl Row {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRow {
    pub address: String,
    pub api_port: String,
    pub api_protocol: String,
}

pub fn endpoint_rows(endpoints: &[NodeEndpoint]) -> Vec<EndpointRow> {
    endpoints
        .iter()
        .map(|endpoint| EndpointRow {
            address: endpoint.address.clone(),
            api_port: format_value(&endpoint.api_port),
            api_protocol: endpoint.api_protocol.clone(),
        })
        .collect()
}

/// State of a progress bar: fill in whole percent, the value text written
/// on the bar, and the caption under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub value: String,
    pub caption: String,
}

impl ProgressView {
    pub fn new(percent: u8, caption: String) -> Self {
        let percent = percent.min(100);
        Self {
            percent,
            value: format!("{percent}%"),
            caption,
        }
    }
}
