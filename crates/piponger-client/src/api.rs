use crate::error::ClientError;
use piponger_model::{ActionResponse, IterationId, Snapshot};
use piponger_view::ActionKind;
use std::future::Future;
use tracing::debug;

pub const SNAPSHOT_PATH: &str = "/";
pub const FORCE_CREATE_PATH: &str = "/force_create_iteration";

/// The server endpoints the dashboard consumes.
pub trait StatusApi: Send + Sync + 'static {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, ClientError>> + Send;

    fn force_create_iteration(
        &self,
    ) -> impl Future<Output = Result<ActionResponse, ClientError>> + Send;
}

/// Result artifacts of a finished iteration. They are opened, never parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    StaticPlot,
    InteractiveGraph,
}

impl Artifact {
    pub fn action(self) -> ActionKind {
        match self {
            Artifact::StaticPlot => ActionKind::OpenPlot,
            Artifact::InteractiveGraph => ActionKind::OpenGraph,
        }
    }

    pub fn path(self, id: &IterationId) -> String {
        match self {
            Artifact::StaticPlot => format!("/get_result_plot/{id}"),
            Artifact::InteractiveGraph => format!("/get_result_plot_js/{id}"),
        }
    }
}

/// `StatusApi` over HTTP. No request timeout is set; a hung request only
/// delays its own cycle.
#[derive(Debug, Clone)]
pub struct HttpStatusApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStatusApi {
    /// `addr` is either `host:port` or a URL with an explicit `http://` or
    /// `https://` scheme.
    pub fn new(addr: &str) -> Result<Self, ClientError> {
        let base_url = base_url(addr)?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn artifact_url(&self, artifact: Artifact, id: &IterationId) -> String {
        self.url(&artifact.path(id))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl StatusApi for HttpStatusApi {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, ClientError>> + Send {
        self.get_json(SNAPSHOT_PATH)
    }

    fn force_create_iteration(
        &self,
    ) -> impl Future<Output = Result<ActionResponse, ClientError>> + Send {
        self.get_json(FORCE_CREATE_PATH)
    }
}

fn base_url(addr: &str) -> Result<String, ClientError> {
    let addr = addr.trim().trim_end_matches('/');
    let (scheme, host) = if let Some(host) = addr.strip_prefix("https://") {
        ("https", host)
    } else if let Some(host) = addr.strip_prefix("http://") {
        ("http", host)
    } else {
        ("http", addr)
    };

    if host.is_empty() || host.contains("://") {
        return Err(ClientError::InvalidAddress(addr.to_string()));
    }
    Ok(format!("{scheme}://{host}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_address_defaults_to_http() {
        assert_eq!(base_url("127.0.0.1:5000").unwrap(), "http://127.0.0.1:5000");
        assert_eq!(
            base_url("https://master.example:8443/").unwrap(),
            "https://master.example:8443"
        );
        assert!(base_url("").is_err());
        assert!(base_url("ftp://host").is_err());
    }

    #[test]
    fn artifact_urls_are_per_iteration() {
        let api = HttpStatusApi::new("10.0.0.1:5000").unwrap();
        let id = IterationId::Number(12);
        assert_eq!(
            api.artifact_url(Artifact::StaticPlot, &id),
            "http://10.0.0.1:5000/get_result_plot/12"
        );
        assert_eq!(
            api.artifact_url(Artifact::InteractiveGraph, &id),
            "http://10.0.0.1:5000/get_result_plot_js/12"
        );
        assert_eq!(api.url(FORCE_CREATE_PATH), "http://10.0.0.1:5000/force_create_iteration");
    }
}
