use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed dimension data: expected at least 7 tokens, found {tokens}")]
    MalformedDimensionData { tokens: usize },

    #[error("invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    FetchFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no page registered for {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: OutputError,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn output(path: impl Into<PathBuf>, source: impl Into<OutputError>) -> Self {
        StoreError::OutputWriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }
}
