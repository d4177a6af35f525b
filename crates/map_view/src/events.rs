//! Failure classification for messages surfaced in the map view.

use shared::error::{FailureKind, SearchFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewErrorCategory {
    Transport,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewError {
    category: ViewErrorCategory,
    message: String,
}

/// Reads a category out of free-form failure text.
fn classify(message: &str) -> ViewErrorCategory {
    let message_lower = message.to_ascii_lowercase();
    if message_lower.contains("decode")
        || message_lower.contains("malformed")
        || message_lower.contains("expected value")
        || message_lower.contains("missing field")
    {
        ViewErrorCategory::Decode
    } else if message_lower.contains("timeout")
        || message_lower.contains("timed out")
        || message_lower.contains("connection")
        || message_lower.contains("transport")
        || message_lower.contains("disconnected")
        || message_lower.contains("unavailable")
    {
        ViewErrorCategory::Transport
    } else {
        ViewErrorCategory::Unknown
    }
}

impl ViewError {
    /// Transport and decode failures carry their own kind; a non-success status is classified by
    /// the body the backend sent with it.
    pub fn from_failure(failure: &SearchFailure) -> Self {
        let category = match failure.kind {
            FailureKind::Transport | FailureKind::Queue => ViewErrorCategory::Transport,
            FailureKind::Decode => ViewErrorCategory::Decode,
            FailureKind::Status => classify(&failure.message),
        };
        Self {
            category,
            message: failure.message.clone(),
        }
    }

    pub fn category(&self) -> ViewErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text shown to the user in place of the raw failure.
    pub fn summary(&self) -> String {
        match self.category {
            ViewErrorCategory::Transport => {
                "Search service unreachable; results on the map may be out of date.".to_string()
            }
            ViewErrorCategory::Decode => {
                "Search service returned an unreadable response.".to_string()
            }
            ViewErrorCategory::Unknown => format!("Search error: {}", self.message),
        }
    }
}
