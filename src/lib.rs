//! Desktop client for crowdsourced diacritic correction of voice transcripts.
//!
//! * [`editor`] — the combining-character editing buffer.
//! * [`task`] — wire types, backend client and the resumable task slot.
//! * [`room`] — task-room state machine and its network worker.
//! * [`config`] — TOML settings and platform paths.
//! * [`app`] — the egui render surface.

pub mod app;
pub mod config;
pub mod editor;
pub mod room;
pub mod task;
