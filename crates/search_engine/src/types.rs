use std::fmt;

use search_core::SourceBatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Debounce timer fired for this input value.
    InputSettled(String),
    /// One source resolved for one generation (failures arrive as empty batches).
    BatchReady(SourceBatch),
}

/// Payload shape a source's response body decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Location,
    Apartment,
}

/// Per-call inputs handed to a [`crate::SearchSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRequest<'a> {
    pub query: &'a str,
    pub token: Option<&'a str>,
    pub save_history: bool,
}

impl<'a> SourceRequest<'a> {
    pub fn anonymous(query: &'a str) -> Self {
        Self {
            query,
            token: None,
            save_history: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Unauthorized,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Unauthorized => write!(f, "authentication required"),
            FailureKind::HttpStatus(code) if *code == 404 => write!(f, "not found (404)"),
            FailureKind::HttpStatus(code) if *code >= 500 => write!(f, "server error ({code})"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
