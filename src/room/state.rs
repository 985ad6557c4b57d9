//! Task-room state machine.
//!
//! [`TaskRoom`] is owned by the view and is the single owner of the live
//! [`EditingSession`].  It never blocks: anything that needs the network is
//! returned as a [`RoomCommand`] for the worker, and the worker's answers
//! come back through [`TaskRoom::apply`].
//!
//! ```text
//! begin_load(false) ──cache hit──▶ Active
//!                   ──cache miss─▶ Loading ──Fetched(success)──▶ Active
//!                                          ──Fetched(no_tasks)──▶ NoTasks
//!                                          ──Fetched(limit)─────▶ LimitReached
//!                                          ──FetchFailed────────▶ Error
//! Active ──prepare_submission──▶ (Submit) ──Submitted──▶ Active + submitted
//!                                         ──SubmitFailed──▶ Active + message
//! ```

use std::time::{Duration, Instant};

use crate::editor::{Diacritic, EditingSession, EditorKey, KeyAction, TextDirection};
use crate::task::{Submission, TaskCache, TaskResponse, TaskStatus, VoiceFlag, VoiceTask};

use super::worker::{RoomCommand, RoomEvent};

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// What the task room is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomStatus {
    /// Waiting for the backend.
    #[default]
    Loading,
    /// A task is open in the editor.
    Active,
    /// The queue is empty.
    NoTasks,
    /// The daily limit is used up.
    LimitReached,
    /// The last fetch failed; `message` says why.
    Error,
}

impl RoomStatus {
    /// A short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Loading => "Loading",
            RoomStatus::Active => "Active",
            RoomStatus::NoTasks => "No tasks",
            RoomStatus::LimitReached => "Limit reached",
            RoomStatus::Error => "Error",
        }
    }

    /// `true` while a fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, RoomStatus::Loading)
    }
}

/// Feedback line shown above the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomMessage {
    Success(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// TaskRoom
// ---------------------------------------------------------------------------

pub struct TaskRoom {
    user_id: u64,
    cache: TaskCache,
    status: RoomStatus,
    task: Option<VoiceTask>,
    session: Option<EditingSession>,
    submitted_at: Option<Instant>,
    submit_pending: bool,
    /// Fetches sent to the worker and not yet answered.
    fetches_in_flight: usize,
    message: Option<RoomMessage>,
    error: Option<String>,
}

impl TaskRoom {
    pub fn new(user_id: u64, cache: TaskCache) -> Self {
        Self {
            user_id,
            cache,
            status: RoomStatus::Loading,
            task: None,
            session: None,
            submitted_at: None,
            submit_pending: false,
            fetches_in_flight: 0,
            message: None,
            error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn task(&self) -> Option<&VoiceTask> {
        self.task.as_ref()
    }

    pub fn session(&self) -> Option<&EditingSession> {
        self.session.as_ref()
    }

    pub fn review_mode(&self) -> bool {
        self.task.as_ref().is_some_and(VoiceTask::review_mode)
    }

    /// `true` once the current task has been accepted by the backend.
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    /// `true` while a submission is waiting for the backend.
    pub fn is_submit_pending(&self) -> bool {
        self.submit_pending
    }

    pub fn message(&self) -> Option<&RoomMessage> {
        self.message.as_ref()
    }

    /// Reason for the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Start loading a task.
    ///
    /// Unless `request_more` is set, a cached task is restored directly and
    /// no command is returned.  Otherwise the caller must forward the
    /// returned [`RoomCommand::FetchNext`] to the worker.
    pub fn begin_load(&mut self, request_more: bool) -> Option<RoomCommand> {
        self.status = RoomStatus::Loading;
        self.task = None;
        self.session = None;
        self.message = None;
        self.error = None;
        self.submitted_at = None;
        self.submit_pending = false;

        if !request_more {
            if let Some(task) = self.cache.load() {
                log::info!("room: resuming cached task #{}", task.id);
                self.activate(task);
                return None;
            }
        }

        self.fetches_in_flight += 1;
        Some(RoomCommand::FetchNext {
            user_id: self.user_id,
            request_more,
        })
    }

    /// Drop the current task and fetch a new one.
    ///
    /// Refused while a submission for the current task is in flight.
    pub fn skip(&mut self) -> Option<RoomCommand> {
        if self.submit_pending {
            log::debug!("room: skip refused, submission in flight");
            return None;
        }
        if let Some(task) = &self.task {
            log::info!("room: skipping task #{}", task.id);
        }
        self.clear_cache();
        self.begin_load(true)
    }

    fn activate(&mut self, task: VoiceTask) {
        self.session = Some(EditingSession::new(task.source_text()));
        self.task = Some(task);
        self.status = RoomStatus::Active;
        self.submitted_at = None;
        self.submit_pending = false;
        self.message = None;
        self.error = None;
    }

    fn deactivate(&mut self, status: RoomStatus) {
        self.task = None;
        self.session = None;
        self.status = status;
        self.clear_cache();
    }

    fn clear_cache(&self) {
        if let Err(e) = self.cache.clear() {
            log::warn!("room: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Worker events
    // -----------------------------------------------------------------------

    /// Fold a worker event into the room state.
    pub fn apply(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Fetched(response) => {
                if self.take_fetch_answer() {
                    self.apply_fetched(response);
                }
            }
            RoomEvent::FetchFailed(message) => {
                log::warn!("room: fetch failed: {message}");
                if self.take_fetch_answer() {
                    self.status = RoomStatus::Error;
                    self.error = Some(message);
                }
            }
            RoomEvent::Submitted { task_id } => {
                if !self.is_current_task(task_id) {
                    log::debug!("room: ignoring stale submit ack for #{task_id}");
                    return;
                }
                log::info!("room: task #{task_id} submitted");
                self.submit_pending = false;
                self.submitted_at = Some(Instant::now());
                self.message = Some(RoomMessage::Success("Saved".into()));
                self.clear_cache();
            }
            RoomEvent::SubmitFailed { task_id, message } => {
                log::warn!("room: submit of #{task_id} failed: {message}");
                if !self.is_current_task(task_id) {
                    return;
                }
                self.submit_pending = false;
                self.message = Some(RoomMessage::Error(format!("Failed to submit: {message}")));
            }
        }
    }

    /// Account for one fetch answer.  Only the answer to the newest fetch
    /// counts, and only while the room is still waiting for it.
    fn take_fetch_answer(&mut self) -> bool {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        let current = self.fetches_in_flight == 0 && self.status == RoomStatus::Loading;
        if !current {
            log::debug!("room: ignoring superseded fetch answer");
        }
        current
    }

    fn is_current_task(&self, task_id: u64) -> bool {
        self.status == RoomStatus::Active && self.task.as_ref().map(|t| t.id) == Some(task_id)
    }

    fn apply_fetched(&mut self, response: TaskResponse) {
        match (response.status, response.task) {
            (TaskStatus::NoTasks, _) => self.deactivate(RoomStatus::NoTasks),
            (TaskStatus::LimitReached, _) => self.deactivate(RoomStatus::LimitReached),
            (TaskStatus::Success, Some(task)) => {
                log::info!(
                    "room: loaded task #{} ({} chars, review={})",
                    task.id,
                    task.word.chars().count(),
                    task.review_mode()
                );
                if let Err(e) = self.cache.save(&task) {
                    log::warn!("room: cannot cache task #{}: {e}", task.id);
                }
                self.activate(task);
            }
            (TaskStatus::Success, None) => {
                log::warn!("room: success response without a task");
                self.deactivate(RoomStatus::NoTasks);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Build the submission for the current edit.
    ///
    /// Returns `None` without an active task, after the task was already
    /// submitted, or while a submission is in flight.
    pub fn prepare_submission(&mut self, flag: VoiceFlag) -> Option<RoomCommand> {
        if self.status != RoomStatus::Active || self.is_submitted() || self.submit_pending {
            return None;
        }
        let task = self.task.as_ref()?;
        let session = self.session.as_ref()?;

        self.submit_pending = true;
        Some(RoomCommand::Submit(Submission {
            user_id: self.user_id,
            task_id: task.id,
            word_after_edit: session.text(),
            flag,
        }))
    }

    /// `true` once `delay` has passed since a successful submission.
    pub fn should_auto_advance(&self, delay: Duration) -> bool {
        self.submitted_at.is_some_and(|t| t.elapsed() >= delay)
    }

    // -----------------------------------------------------------------------
    // Editing (delegated to the session)
    // -----------------------------------------------------------------------

    pub fn select_at(&mut self, index: usize) -> bool {
        match self.editable_session() {
            Some(session) => session.select_at(index),
            None => false,
        }
    }

    pub fn apply_diacritic(&mut self, mark: Option<Diacritic>) -> bool {
        match self.editable_session() {
            Some(session) => session.apply_diacritic(mark),
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: EditorKey, text_direction: TextDirection) -> KeyAction {
        match self.editable_session() {
            Some(session) => session.handle_key(key, text_direction),
            None => KeyAction::Ignored,
        }
    }

    /// The session, unless the task is no longer editable.
    fn editable_session(&mut self) -> Option<&mut EditingSession> {
        if self.submitted_at.is_some() {
            return None;
        }
        self.session.as_mut()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn task(id: u64, word: &str) -> VoiceTask {
        VoiceTask {
            id,
            voice_name: format!("voices/{id}.wav"),
            word: word.into(),
            original_word: None,
            is_review_mode: None,
            flag: None,
            admin_name: None,
            upload_date: None,
            voice_url: None,
        }
    }

    fn success(t: VoiceTask) -> RoomEvent {
        RoomEvent::Fetched(TaskResponse {
            status: TaskStatus::Success,
            message: None,
            task: Some(t),
        })
    }

    fn room_in_temp() -> (TaskRoom, TaskCache, TempDir) {
        let dir = tempdir().expect("temp dir");
        let cache = TaskCache::at(dir.path().join("active-task.json"));
        (TaskRoom::new(7, cache.clone()), cache, dir)
    }

    // ---- RoomStatus ---

    #[test]
    fn default_status_is_loading() {
        assert_eq!(RoomStatus::default(), RoomStatus::Loading);
        assert!(RoomStatus::Loading.is_busy());
        assert!(!RoomStatus::Active.is_busy());
        assert_eq!(RoomStatus::LimitReached.label(), "Limit reached");
    }

    // ---- Loading ---

    #[test]
    fn empty_cache_requests_fetch() {
        let (mut room, _cache, _dir) = room_in_temp();
        assert_eq!(
            room.begin_load(false),
            Some(RoomCommand::FetchNext {
                user_id: 7,
                request_more: false
            })
        );
        assert_eq!(room.status(), RoomStatus::Loading);
    }

    #[test]
    fn cached_task_is_resumed_without_fetch() {
        let (mut room, cache, _dir) = room_in_temp();
        cache.save(&task(3, "سلام")).unwrap();

        assert_eq!(room.begin_load(false), None);
        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.task().map(|t| t.id), Some(3));
        assert_eq!(room.session().map(|s| s.len()), Some(4));
    }

    #[test]
    fn request_more_bypasses_cache() {
        let (mut room, cache, _dir) = room_in_temp();
        cache.save(&task(3, "سلام")).unwrap();

        assert!(matches!(
            room.begin_load(true),
            Some(RoomCommand::FetchNext {
                request_more: true,
                ..
            })
        ));
    }

    #[test]
    fn fetched_task_is_activated_and_cached() {
        let (mut room, cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(11, "كتب")));

        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.session().and_then(|s| s.selected()), Some(0));
        assert_eq!(cache.load().map(|t| t.id), Some(11));
    }

    #[test]
    fn no_tasks_clears_cache() {
        let (mut room, cache, _dir) = room_in_temp();
        cache.save(&task(3, "x")).unwrap();
        room.begin_load(true);
        room.apply(RoomEvent::Fetched(TaskResponse::no_tasks()));

        assert_eq!(room.status(), RoomStatus::NoTasks);
        assert!(room.task().is_none());
        assert!(cache.load().is_none());
    }

    #[test]
    fn limit_reached_clears_task() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(1, "a")));
        room.begin_load(true);
        room.apply(RoomEvent::Fetched(TaskResponse {
            status: TaskStatus::LimitReached,
            message: None,
            task: None,
        }));
        assert_eq!(room.status(), RoomStatus::LimitReached);
        assert!(room.session().is_none());
    }

    #[test]
    fn fetch_failure_sets_error() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(RoomEvent::FetchFailed("connection refused".into()));
        assert_eq!(room.status(), RoomStatus::Error);
        assert_eq!(room.error(), Some("connection refused"));
    }

    #[test]
    fn skip_clears_cache_and_fetches_more() {
        let (mut room, cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(4, "ab")));

        let cmd = room.skip();
        assert!(matches!(
            cmd,
            Some(RoomCommand::FetchNext {
                request_more: true,
                ..
            })
        ));
        assert!(cache.load().is_none());
    }

    // ---- Editing + submission ---

    #[test]
    fn submission_carries_recomposed_text() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "سلام")));

        room.select_at(0);
        room.apply_diacritic(Some(Diacritic::Fatha));

        let cmd = room.prepare_submission(VoiceFlag::Music);
        assert_eq!(
            cmd,
            Some(RoomCommand::Submit(Submission {
                user_id: 7,
                task_id: 5,
                word_after_edit: "سَلام".into(),
                flag: VoiceFlag::Music,
            }))
        );
    }

    #[test]
    fn no_double_submission_while_pending() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));

        assert!(room.prepare_submission(VoiceFlag::None).is_some());
        assert!(room.prepare_submission(VoiceFlag::None).is_none());
    }

    #[test]
    fn submit_without_task_is_none() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        assert!(room.prepare_submission(VoiceFlag::None).is_none());
    }

    #[test]
    fn successful_submit_locks_editor_and_clears_cache() {
        let (mut room, cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));
        room.prepare_submission(VoiceFlag::None);
        room.apply(RoomEvent::Submitted { task_id: 5 });

        assert!(room.is_submitted());
        assert!(cache.load().is_none());
        assert!(matches!(room.message(), Some(RoomMessage::Success(_))));
        assert!(!room.apply_diacritic(Some(Diacritic::Damma)));
        assert!(room.prepare_submission(VoiceFlag::None).is_none());
        assert!(room.should_auto_advance(Duration::ZERO));
    }

    #[test]
    fn failed_submit_keeps_edit_and_allows_retry() {
        let (mut room, cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));
        room.apply_diacritic(Some(Diacritic::Kasra));
        room.prepare_submission(VoiceFlag::None);
        room.apply(RoomEvent::SubmitFailed {
            task_id: 5,
            message: "status 500".into(),
        });

        assert!(!room.is_submitted());
        assert!(matches!(room.message(), Some(RoomMessage::Error(_))));
        assert_eq!(cache.load().map(|t| t.id), Some(5));
        assert!(room.prepare_submission(VoiceFlag::None).is_some());
        assert!(!room.should_auto_advance(Duration::ZERO));
    }

    #[test]
    fn stale_submit_ack_is_ignored() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(6, "ab")));
        room.apply(RoomEvent::Submitted { task_id: 5 });
        assert!(!room.is_submitted());
    }

    // ---- Late worker answers ---

    #[test]
    fn submit_ack_after_reload_does_not_lock_next_task() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));
        assert!(room.prepare_submission(VoiceFlag::None).is_some());

        // Ack for #5 arrives after the room already asked for the next task.
        room.begin_load(true);
        room.apply(RoomEvent::Submitted { task_id: 5 });
        assert_eq!(room.status(), RoomStatus::Loading);
        assert!(!room.is_submitted());

        room.apply(success(task(6, "cd")));
        assert_eq!(room.task().map(|t| t.id), Some(6));
        assert!(!room.is_submitted());
        assert!(!room.should_auto_advance(Duration::ZERO));
        assert!(room.apply_diacritic(Some(Diacritic::Fatha)));
        assert!(room.prepare_submission(VoiceFlag::None).is_some());
    }

    #[test]
    fn submit_failure_after_reload_leaves_no_message() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));
        room.prepare_submission(VoiceFlag::None);

        room.begin_load(true);
        room.apply(RoomEvent::SubmitFailed {
            task_id: 5,
            message: "status 500".into(),
        });
        assert!(room.message().is_none());

        room.apply(success(task(6, "cd")));
        assert!(room.message().is_none());
        assert!(!room.is_submit_pending());
    }

    #[test]
    fn same_task_served_again_starts_unlocked() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));
        room.prepare_submission(VoiceFlag::None);
        room.begin_load(true);
        room.apply(RoomEvent::Submitted { task_id: 5 });
        room.apply(success(task(5, "ab")));

        assert_eq!(room.status(), RoomStatus::Active);
        assert!(!room.is_submitted());
    }

    #[test]
    fn skip_is_refused_while_submit_pending() {
        let (mut room, cache, _dir) = room_in_temp();
        room.begin_load(false);
        room.apply(success(task(5, "ab")));
        room.prepare_submission(VoiceFlag::None);

        assert_eq!(room.skip(), None);
        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(cache.load().map(|t| t.id), Some(5));

        room.apply(RoomEvent::SubmitFailed {
            task_id: 5,
            message: "status 500".into(),
        });
        assert!(room.skip().is_some());
    }

    #[test]
    fn superseded_fetch_is_ignored() {
        let (mut room, _cache, _dir) = room_in_temp();
        assert!(room.begin_load(true).is_some());
        assert!(room.begin_load(true).is_some());

        room.apply(success(task(7, "ab")));
        assert_eq!(room.status(), RoomStatus::Loading);
        assert!(room.task().is_none());

        room.apply(success(task(8, "cd")));
        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.task().map(|t| t.id), Some(8));
    }

    #[test]
    fn superseded_fetch_failure_is_ignored() {
        let (mut room, _cache, _dir) = room_in_temp();
        room.begin_load(true);
        room.begin_load(true);

        room.apply(RoomEvent::FetchFailed("timeout".into()));
        assert_eq!(room.status(), RoomStatus::Loading);
        assert!(room.error().is_none());

        room.apply(success(task(8, "cd")));
        assert_eq!(room.status(), RoomStatus::Active);
    }

    #[test]
    fn fetch_answer_after_cache_resume_is_ignored() {
        let (mut room, cache, _dir) = room_in_temp();
        assert!(room.begin_load(false).is_some());

        cache.save(&task(3, "سلام")).unwrap();
        assert_eq!(room.begin_load(false), None);
        room.apply(success(task(9, "ab")));

        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.task().map(|t| t.id), Some(3));
    }

    #[test]
    fn keys_without_session_are_ignored() {
        let (mut room, _cache, _dir) = room_in_temp();
        assert_eq!(
            room.handle_key(EditorKey::ArrowLeft, TextDirection::Rtl),
            KeyAction::Ignored
        );
    }

    #[test]
    fn review_mode_follows_task() {
        let (mut room, _cache, _dir) = room_in_temp();
        let mut t = task(8, "ab");
        t.is_review_mode = Some(true);
        room.begin_load(false);
        room.apply(success(t));
        assert!(room.review_mode());
    }
}
