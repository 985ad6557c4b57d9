//! `TaskSource` / `SubmissionSink` traits and the HTTP `ApiClient`.
//!
//! The editing core never talks to the network.  The room worker holds the
//! two traits behind `Arc<dyn …>`; `ApiClient` implements both against the
//! backend's REST API.  All connection details come from [`ApiConfig`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use super::types::{Submission, TaskResponse};
use super::url::format_voice_url;
use super::TaskError;
use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Supplies the next task for a contributor.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// `request_more` asks the backend to lift the daily limit.
    async fn next_task(&self, user_id: u64, request_more: bool)
        -> Result<TaskResponse, TaskError>;
}

/// Accepts finished corrections.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<(), TaskError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Free ngrok tunnels interpose an HTML warning page unless this is sent.
const NGROK_SKIP_WARNING: &str = "ngrok-skip-browser-warning";

/// reqwest-backed client for the task backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout and the default
    /// headers.  A default client is used if the builder fails.
    pub fn from_config(config: &ApiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(NGROK_SKIP_WARNING),
            HeaderValue::from_static("true"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("api: client builder failed ({e}); using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe the backend.  Any answer below 500 counts as reachable.
    pub async fn check_health(&self) -> bool {
        let result = self
            .client
            .get(self.endpoint("/docs"))
            .timeout(self.health_timeout)
            .send()
            .await;
        match result {
            Ok(resp) => resp.status().as_u16() < 500,
            Err(e) => {
                log::debug!("api: health check failed: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl TaskSource for ApiClient {
    async fn next_task(
        &self,
        user_id: u64,
        request_more: bool,
    ) -> Result<TaskResponse, TaskError> {
        let response = self
            .client
            .get(self.endpoint("/users/tasks/next"))
            .query(&[
                ("user_id", user_id.to_string()),
                ("request_more", request_more.to_string()),
            ])
            .send()
            .await?;

        // The backend answers 404 when the queue is empty.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TaskResponse::no_tasks());
        }
        if !response.status().is_success() {
            return Err(TaskError::Status(response.status().as_u16()));
        }

        let mut body: TaskResponse = response
            .json()
            .await
            .map_err(|e| TaskError::Parse(e.to_string()))?;

        if let Some(task) = body.task.as_mut() {
            task.voice_url = Some(format_voice_url(&self.base_url, &task.voice_name));
        }

        Ok(body)
    }
}

#[async_trait]
impl SubmissionSink for ApiClient {
    async fn submit(&self, submission: &Submission) -> Result<(), TaskError> {
        let response = self
            .client
            .post(self.endpoint("/users/tasks/submit"))
            .json(submission)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TaskError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
