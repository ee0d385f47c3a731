use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server address: {0}")]
    InvalidAddress(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with HTTP {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}
