use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the rewind workspace.
///
/// Covers history-source failures, upstream contract violations, configuration
/// validation, lifecycle misuse of one-shot suppliers and iterators, and
/// undecodable wire payloads.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryError {
    /// The history source failed (transport or remote failure). Never retried by the engine.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Name of the history source that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Upstream violated the ordering or size contract (e.g. an empty non-final page).
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Invalid configuration or argument, raised at construction.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// `start()` was called on a supplier that has already been started.
    #[error("supplier already started")]
    AlreadyStarted,

    /// `next()` was called on an iterator that already reported completion.
    #[error("iterator already done")]
    AlreadyDone,

    /// A record returned by the source could not be decoded.
    #[error("data issue: {0}")]
    Data(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl HistoryError {
    /// Helper: build a `Source` error with the source name and message.
    pub fn source(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Protocol` error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Returns true if repeating the same request could plausibly succeed.
    ///
    /// Only source failures qualify; contract, validation, and lifecycle errors
    /// are deterministic. The engine itself never retries; this is a hint for
    /// error handlers that decide whether to keep a pipeline alive.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Source { .. })
    }
}
