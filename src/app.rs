//! Task room window — egui/eframe application.
//!
//! # Architecture
//!
//! [`TaskRoomApp`] is the top-level [`eframe::App`].  It owns the
//! [`TaskRoom`] and two channel endpoints:
//!
//! * `command_tx` — sends [`RoomCommand`] to the [`RoomWorker`](crate::room::RoomWorker).
//! * `event_rx`   — receives [`RoomEvent`] back from the worker.
//!
//! # Screens
//!
//! | Status | Visual |
//! |--------|--------|
//! | `Loading` | Spinner |
//! | `Error` | Error text + Retry |
//! | `LimitReached` | Notice + Request more |
//! | `NoTasks` | Notice + Check again |
//! | `Active` | Header, editor, diacritic bar, submit buttons |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::editor::{Diacritic, EditorKey, GroupKind, KeyAction, TextDirection};
use crate::room::{RoomCommand, RoomEvent, RoomMessage, RoomStatus, TaskRoom};
use crate::task::VoiceFlag;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(99, 102, 241);
const MUTED: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
const SUCCESS: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const DANGER: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);
const MARK: egui::Color32 = egui::Color32::from_rgb(220, 60, 60);

// ---------------------------------------------------------------------------
// Key mapping
// ---------------------------------------------------------------------------

/// Translate an egui key into the editor's key vocabulary.
pub fn map_key(key: egui::Key) -> EditorKey {
    match key {
        egui::Key::ArrowLeft => EditorKey::ArrowLeft,
        egui::Key::ArrowRight => EditorKey::ArrowRight,
        egui::Key::Delete => EditorKey::Delete,
        egui::Key::Backspace => EditorKey::Backspace,
        egui::Key::Enter => EditorKey::Enter,
        egui::Key::Space => EditorKey::Space,
        _ => EditorKey::Other,
    }
}

// ---------------------------------------------------------------------------
// TaskRoomApp
// ---------------------------------------------------------------------------

pub struct TaskRoomApp {
    room: TaskRoom,

    // ── UI state ─────────────────────────────────────────────────────────
    show_report: bool,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<RoomCommand>,
    event_rx: mpsc::Receiver<RoomEvent>,

    config: AppConfig,
}

impl TaskRoomApp {
    /// Create the app around an already-started room.
    ///
    /// `main` calls [`TaskRoom::begin_load`] before handing the room over, so
    /// the first frame may already show a resumed task.
    pub fn new(
        room: TaskRoom,
        command_tx: mpsc::Sender<RoomCommand>,
        event_rx: mpsc::Receiver<RoomEvent>,
        config: AppConfig,
    ) -> Self {
        Self {
            room,
            show_report: false,
            command_tx,
            event_rx,
            config,
        }
    }

    // ── Channel plumbing ─────────────────────────────────────────────────

    fn send(&self, command: Option<RoomCommand>) {
        let Some(command) = command else { return };
        if let Err(e) = self.command_tx.try_send(command) {
            log::warn!("app: cannot reach worker: {e}");
        }
    }

    /// Drain all pending worker events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.room.apply(event);
        }
    }

    fn check_auto_advance(&mut self) {
        let delay = Duration::from_millis(self.config.ui.next_task_delay_ms);
        if self.room.should_auto_advance(delay) {
            let command = self.room.begin_load(true);
            self.send(command);
        }
    }

    fn load_more(&mut self) {
        let command = self.room.begin_load(true);
        self.send(command);
    }

    fn submit(&mut self, flag: VoiceFlag) {
        let command = self.room.prepare_submission(flag);
        self.send(command);
    }

    fn play_audio(&self, ctx: &egui::Context) {
        let Some(task) = self.room.task() else { return };
        let url = task.audio_url();
        if url.is_empty() {
            log::warn!("app: task #{} has no audio url", task.id);
            return;
        }
        log::debug!("app: opening audio {url}");
        ctx.open_url(egui::OpenUrl::new_tab(url));
    }

    // ── Keyboard ─────────────────────────────────────────────────────────

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if self.room.status() != RoomStatus::Active || self.show_report {
            return;
        }
        let keys: Vec<EditorKey> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => Some(map_key(*key)),
                    _ => None,
                })
                .collect()
        });

        for key in keys {
            if self.room.handle_key(key, self.config.editor.text_direction) == KeyAction::PlayAudio
            {
                self.play_audio(ctx);
            }
        }
    }

    // ── Status screens ───────────────────────────────────────────────────

    fn draw_loading(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.spinner();
            ui.label(egui::RichText::new("Loading…").color(MUTED));
        });
    }

    /// A centred notice with one action button.  Returns `true` if clicked.
    fn draw_notice(
        ui: &mut egui::Ui,
        title: &str,
        body: &str,
        color: egui::Color32,
        action: &str,
    ) -> bool {
        let mut clicked = false;
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(egui::RichText::new(title).color(color).size(20.0).strong());
            ui.add_space(6.0);
            ui.label(egui::RichText::new(body).color(MUTED));
            ui.add_space(12.0);
            clicked = ui
                .add(egui::Button::new(egui::RichText::new(action).size(14.0)))
                .clicked();
        });
        clicked
    }

    // ── Active task ──────────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(task) = self.room.task() else { return };
        let id = task.id;
        let review = self.room.review_mode();
        let submitted = self.room.is_submitted();
        let pending = self.room.is_submit_pending();

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Task #{id}")).size(16.0).strong());
            if review {
                ui.label(
                    egui::RichText::new("REVIEW")
                        .color(egui::Color32::WHITE)
                        .background_color(ACCENT)
                        .size(11.0),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!pending, egui::Button::new("Skip"))
                    .clicked()
                {
                    let command = self.room.skip();
                    self.send(command);
                }
                if ui
                    .add_enabled(!submitted, egui::Button::new("Report"))
                    .clicked()
                {
                    self.show_report = true;
                }
                if ui.button("▶ Play").clicked() {
                    self.play_audio(ctx);
                }
            });
        });
    }

    fn draw_message(&self, ui: &mut egui::Ui) {
        match self.room.message() {
            Some(RoomMessage::Success(text)) => {
                ui.label(egui::RichText::new(text.as_str()).color(SUCCESS));
            }
            Some(RoomMessage::Error(text)) => {
                ui.label(egui::RichText::new(text.as_str()).color(DANGER));
            }
            None => {}
        }
    }

    /// Render the word groups; clicking a cell moves the caret there.
    fn draw_editor(&mut self, ui: &mut egui::Ui) {
        let Some(session) = self.room.session() else { return };
        let selected = session.selected();
        let font_size = self.config.editor.font_size;
        let layout = match self.config.editor.text_direction {
            TextDirection::Rtl => egui::Layout::right_to_left(egui::Align::Center),
            TextDirection::Ltr => egui::Layout::left_to_right(egui::Align::Center),
        };

        let mut clicked = None;
        egui::Frame::new()
            .fill(ui.visuals().extreme_bg_color)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.set_min_height(font_size * 2.0);
                ui.with_layout(layout.with_main_wrap(true), |ui| {
                    for group in session.groups() {
                        if group.kind == GroupKind::Separator {
                            ui.add_space(font_size * 0.4 * group.cells.len() as f32);
                            continue;
                        }
                        // Cells of one word stay together on a line.
                        ui.push_id(group.key(), |ui| {
                            ui.spacing_mut().item_spacing.x = 0.0;
                            for cell in group.cells {
                                let mut text = egui::RichText::new(cell.render()).size(font_size);
                                if selected == Some(cell.position) {
                                    text = text
                                        .background_color(ACCENT.linear_multiply(0.35))
                                        .underline();
                                }
                                if cell.diacritic.is_some() {
                                    text = text.color(MARK);
                                }
                                let response = ui
                                    .push_id(cell.id.get(), |ui| {
                                        ui.add(egui::Label::new(text).sense(egui::Sense::click()))
                                    })
                                    .inner;
                                if response.clicked() {
                                    clicked = Some(cell.position);
                                }
                            }
                        });
                    }
                });
            });

        if let Some(index) = clicked {
            self.room.select_at(index);
        }
    }

    fn draw_diacritic_bar(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.room.is_submitted();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(enabled, egui::Button::new("Clear"))
                .clicked()
            {
                self.room.apply_diacritic(None);
            }
            for mark in Diacritic::ALL {
                let label = format!("ـ{}  {}", mark.as_char(), mark.name());
                if ui
                    .add_enabled(
                        enabled,
                        egui::Button::new(egui::RichText::new(label).size(16.0)),
                    )
                    .clicked()
                {
                    self.room.apply_diacritic(Some(mark));
                }
            }
        });
    }

    fn draw_submit(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.room.is_submitted();
        ui.horizontal(|ui| {
            if self.room.review_mode() {
                if ui
                    .add_enabled(
                        enabled,
                        egui::Button::new(egui::RichText::new("✔ Confirm correct").color(SUCCESS)),
                    )
                    .clicked()
                {
                    self.submit(VoiceFlag::None);
                }
                if ui
                    .add_enabled(enabled, egui::Button::new("Submit edit"))
                    .clicked()
                {
                    self.submit(VoiceFlag::None);
                }
            } else if ui
                .add_enabled(
                    enabled,
                    egui::Button::new(egui::RichText::new("Submit").size(15.0)),
                )
                .clicked()
            {
                self.submit(VoiceFlag::None);
            }
        });
    }

    fn draw_report_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_report {
            return;
        }
        let mut open = true;
        let mut chosen = None;
        egui::Window::new("Report a problem")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("What is wrong with this clip?").color(MUTED));
                ui.add_space(4.0);
                for flag in VoiceFlag::REPORTABLE {
                    if ui.button(flag.label()).clicked() {
                        chosen = Some(flag);
                    }
                }
            });

        if let Some(flag) = chosen {
            log::info!("app: reporting task as {flag:?}");
            self.submit(flag);
            open = false;
        }
        self.show_report = open;
    }

    fn draw_active(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        self.draw_header(ui, ctx);
        ui.separator();
        self.draw_message(ui);
        ui.add_space(8.0);
        self.draw_editor(ui);
        ui.add_space(8.0);
        self.draw_diacritic_bar(ui);
        ui.add_space(8.0);
        self.draw_submit(ui);
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("←/→ move · Delete clear · Enter/Space play")
                .color(MUTED)
                .size(11.0),
        );
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TaskRoomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.check_auto_advance();
        self.handle_keys(ctx);

        // Keep polling the worker while something is outstanding.
        if self.room.status().is_busy() || self.room.is_submitted() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.room.status() {
            RoomStatus::Loading => self.draw_loading(ui),
            RoomStatus::Error => {
                let body = self.room.error().unwrap_or("unknown error").to_owned();
                if Self::draw_notice(ui, "Connection error", &body, DANGER, "Retry") {
                    self.load_more();
                }
            }
            RoomStatus::LimitReached => {
                if Self::draw_notice(
                    ui,
                    "Daily limit reached",
                    "You have finished today's tasks.",
                    ACCENT,
                    "Request more tasks",
                ) {
                    self.load_more();
                }
            }
            RoomStatus::NoTasks => {
                if Self::draw_notice(
                    ui,
                    "No tasks",
                    "There are no new voice tasks in the queue right now.",
                    MUTED,
                    "Check again",
                ) {
                    self.load_more();
                }
            }
            RoomStatus::Active => self.draw_active(ui, ctx),
        });

        self.draw_report_dialog(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("task room closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskCache, TaskResponse, TaskStatus, VoiceTask};
    use tempfile::tempdir;

    #[test]
    fn editor_keys_are_mapped() {
        assert_eq!(map_key(egui::Key::ArrowLeft), EditorKey::ArrowLeft);
        assert_eq!(map_key(egui::Key::ArrowRight), EditorKey::ArrowRight);
        assert_eq!(map_key(egui::Key::Delete), EditorKey::Delete);
        assert_eq!(map_key(egui::Key::Backspace), EditorKey::Backspace);
        assert_eq!(map_key(egui::Key::Enter), EditorKey::Enter);
        assert_eq!(map_key(egui::Key::Space), EditorKey::Space);
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key(egui::Key::A), EditorKey::Other);
        assert_eq!(map_key(egui::Key::Tab), EditorKey::Other);
    }

    #[test]
    fn submit_forwards_command_to_worker() {
        let dir = tempdir().expect("temp dir");
        let mut room = TaskRoom::new(1, TaskCache::at(dir.path().join("t.json")));
        room.begin_load(true);
        room.apply(RoomEvent::Fetched(TaskResponse {
            status: TaskStatus::Success,
            message: None,
            task: Some(VoiceTask {
                id: 9,
                voice_name: "v.wav".into(),
                word: "سلام".into(),
                original_word: None,
                is_review_mode: None,
                flag: None,
                admin_name: None,
                upload_date: None,
                voice_url: None,
            }),
        }));

        let (command_tx, mut command_rx) = mpsc::channel(4);
        let (_event_tx, event_rx) = mpsc::channel(4);
        let mut app = TaskRoomApp::new(room, command_tx, event_rx, AppConfig::default());

        app.submit(VoiceFlag::Distorted);
        match command_rx.try_recv() {
            Ok(RoomCommand::Submit(s)) => {
                assert_eq!(s.task_id, 9);
                assert_eq!(s.flag, VoiceFlag::Distorted);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn worker_events_are_applied_on_poll() {
        let dir = tempdir().expect("temp dir");
        let mut room = TaskRoom::new(1, TaskCache::at(dir.path().join("t.json")));
        room.begin_load(true);

        let (command_tx, _command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(4);
        let mut app = TaskRoomApp::new(room, command_tx, event_rx, AppConfig::default());

        event_tx
            .try_send(RoomEvent::Fetched(TaskResponse::no_tasks()))
            .unwrap();
        app.poll_events();
        assert_eq!(app.room.status(), RoomStatus::NoTasks);
    }
}
