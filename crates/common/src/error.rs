use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Transport failures and non-2xx responses.
    pub fn is_network(&self) -> bool {
        matches!(self, TrackerError::Network(_) | TrackerError::Status { .. })
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
