//! Combining-character editing buffer.
//!
//! # Overview
//!
//! ```text
//! source text ──decompose──▶ Vec<CharCell> ──group──▶ Vec<WordGroup>  (render)
//!                                 │
//!                    EditingSession (caret, select_at / advance /
//!                                    apply_diacritic / handle_key)
//!                                 │
//!                            recompose ──▶ submitted text
//! ```
//!
//! # Quick start
//!
//! ```
//! use vtg_editor::editor::{Diacritic, EditingSession};
//!
//! let mut session = EditingSession::new("سلام");
//! session.select_at(0);
//! session.apply_diacritic(Some(Diacritic::Fatha));
//! assert_eq!(session.text(), "سَلام");
//! assert_eq!(session.selected(), Some(1));
//! ```

pub mod cell;
pub mod group;
pub mod keys;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cell::{decompose, is_diacritic, recompose, CellId, CharCell, Diacritic};
pub use group::{group, GroupKind, WordGroup};
pub use keys::{ArrowKey, Direction, EditorKey, KeyAction, TextDirection};
pub use session::EditingSession;
