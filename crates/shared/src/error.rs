use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Status,
    Decode,
    Queue,
}

/// Cloneable summary of a failed search, safe to hand across threads and to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search transport error: {0}")]
    Transport(String),
    #[error("search backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode search response: {0}")]
    Decode(String),
    #[error("search command queue is full")]
    QueueFull,
    #[error("search worker disconnected")]
    WorkerDisconnected,
}

impl SearchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Status,
            Self::Decode(_) => FailureKind::Decode,
            Self::QueueFull | Self::WorkerDisconnected => FailureKind::Queue,
        }
    }
}

impl From<SearchError> for SearchFailure {
    fn from(value: SearchError) -> Self {
        Self {
            kind: value.kind(),
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
