//! Task room — one task at a time, from fetch to submission.
//!
//! # Architecture
//!
//! ```text
//!   view (egui update loop)
//!        │ owns
//!        ▼
//!   TaskRoom ── EditingSession        (sync: keys, clicks, diacritics)
//!        │  ▲
//!   RoomCommand   RoomEvent           (tokio::sync::mpsc)
//!        ▼  │
//!   RoomWorker ── Arc<dyn TaskSource>, Arc<dyn SubmissionSink>   (async)
//! ```
//!
//! Only one session is ever live: loading a task replaces the previous
//! session rather than running alongside it.

pub mod state;
pub mod worker;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use state::{RoomMessage, RoomStatus, TaskRoom};
pub use worker::{RoomCommand, RoomEvent, RoomWorker};
