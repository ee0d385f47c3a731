use crate::format::format_value;
use piponger_model::PongerInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRow {
    pub address: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PongerView {
    pub ports: Vec<PortRow>,
}

pub fn project_ponger(info: &PongerInfo) -> PongerView {
    PongerView {
        ports: info
            .pinger_port_list
            .iter()
            .map(|allocated| PortRow {
                address: allocated.address.clone(),
                port: format_value(&allocated.port),
            })
            .collect(),
    }
}
