//! Network worker — turns [`RoomCommand`]s into [`RoomEvent`]s.
//!
//! The worker runs as a tokio task next to the UI.  It owns the task source
//! and submission sink and nothing else; all room state stays with the view.
//!
//! ```text
//! RoomCommand::FetchNext ──▶ source.next_task()  ──▶ Fetched / FetchFailed
//! RoomCommand::Submit    ──▶ sink.submit()       ──▶ Submitted / SubmitFailed
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::task::{Submission, SubmissionSink, TaskResponse, TaskSource};

/// Requests from the room to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    /// Fetch the next task for `user_id`.
    FetchNext { user_id: u64, request_more: bool },
    /// Send a finished correction.
    Submit(Submission),
}

/// Answers from the worker to the room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Fetched(TaskResponse),
    FetchFailed(String),
    Submitted { task_id: u64 },
    SubmitFailed { task_id: u64, message: String },
}

/// Drives task fetches and submissions.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tokio::sync::mpsc;
/// use vtg_editor::config::ApiConfig;
/// use vtg_editor::room::RoomWorker;
/// use vtg_editor::task::ApiClient;
///
/// # async fn example() {
/// let client = Arc::new(ApiClient::from_config(&ApiConfig::default()));
/// let (command_tx, command_rx) = mpsc::channel(16);
/// let (event_tx, event_rx) = mpsc::channel(16);
///
/// tokio::spawn(RoomWorker::new(client.clone(), client).run(command_rx, event_tx));
/// // command_tx and event_rx go to the view.
/// # drop((command_tx, event_rx));
/// # }
/// ```
pub struct RoomWorker {
    source: Arc<dyn TaskSource>,
    sink: Arc<dyn SubmissionSink>,
}

impl RoomWorker {
    pub fn new(source: Arc<dyn TaskSource>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self { source, sink }
    }

    /// Run until `command_rx` is closed or the event receiver is dropped.
    pub async fn run(
        self,
        mut command_rx: mpsc::Receiver<RoomCommand>,
        event_tx: mpsc::Sender<RoomEvent>,
    ) {
        while let Some(command) = command_rx.recv().await {
            let event = self.handle(command).await;
            if event_tx.send(event).await.is_err() {
                log::info!("worker: event receiver dropped, shutting down");
                return;
            }
        }

        log::info!("worker: command channel closed, shutting down");
    }

    async fn handle(&self, command: RoomCommand) -> RoomEvent {
        match command {
            RoomCommand::FetchNext {
                user_id,
                request_more,
            } => {
                log::debug!("worker: fetching next task (request_more={request_more})");
                match self.source.next_task(user_id, request_more).await {
                    Ok(response) => RoomEvent::Fetched(response),
                    Err(e) => RoomEvent::FetchFailed(e.to_string()),
                }
            }
            RoomCommand::Submit(submission) => {
                let task_id = submission.task_id;
                log::debug!(
                    "worker: submitting task #{task_id} (flag={:?})",
                    submission.flag
                );
                match self.sink.submit(&submission).await {
                    Ok(()) => RoomEvent::Submitted { task_id },
                    Err(e) => RoomEvent::SubmitFailed {
                        task_id,
                        message: e.to_string(),
                    },
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
