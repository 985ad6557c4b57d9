//! Task plumbing around the editor.
//!
//! This module provides:
//! * [`VoiceTask`], [`TaskResponse`], [`Submission`], [`VoiceFlag`] — wire types.
//! * [`TaskSource`] / [`SubmissionSink`] — async traits the room worker uses.
//! * [`ApiClient`] — reqwest implementation of both against the backend.
//! * [`TaskCache`] — the single resumable "active task" slot on disk.
//! * [`normalize_base_url`] / [`format_voice_url`] — URL helpers.
//! * [`TaskError`] — error variants for everything above.

pub mod cache;
pub mod client;
pub mod types;
pub mod url;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cache::TaskCache;
pub use client::{ApiClient, SubmissionSink, TaskSource};
pub use types::{Submission, TaskResponse, TaskStatus, VoiceFlag, VoiceTask};
pub use url::{format_voice_url, normalize_base_url};

// ---------------------------------------------------------------------------
// TaskError
// ---------------------------------------------------------------------------

/// Errors from fetching, submitting or caching tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    /// HTTP transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with an unexpected status code.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Reading or writing the task cache failed.
    #[error("task cache: {0}")]
    Cache(#[from] std::io::Error),
}

impl From<reqwest::Error> for TaskError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TaskError::Timeout
        } else {
            TaskError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(e: serde_json::Error) -> Self {
        TaskError::Parse(e.to_string())
    }
}
