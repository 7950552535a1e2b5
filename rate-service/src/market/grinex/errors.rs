use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status code: {0}")]
    UpstreamStatus(u16),

    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
