//! Direction handling and the editor's key grammar.
//!
//! Navigation inside the session is logical (`Forward` = next cell in
//! reading order).  Which physical arrow key means "forward" depends on the
//! reading direction in effect when the key is pressed, so the mapping is
//! resolved per call rather than baked into the session.

use serde::{Deserialize, Serialize};

/// Logical step through the cell sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher positions.
    Forward,
    /// Towards lower positions.
    Backward,
}

impl Direction {
    /// Signed index step.
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Reading direction of the presented text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    #[default]
    Rtl,
}

impl TextDirection {
    /// Map a physical arrow key to a logical direction.
    ///
    /// ```
    /// use vtg_editor::editor::{ArrowKey, Direction, TextDirection};
    ///
    /// assert_eq!(TextDirection::Rtl.resolve(ArrowKey::Left), Direction::Forward);
    /// assert_eq!(TextDirection::Ltr.resolve(ArrowKey::Left), Direction::Backward);
    /// ```
    pub fn resolve(self, arrow: ArrowKey) -> Direction {
        match (self, arrow) {
            (TextDirection::Ltr, ArrowKey::Right) | (TextDirection::Rtl, ArrowKey::Left) => {
                Direction::Forward
            }
            (TextDirection::Ltr, ArrowKey::Left) | (TextDirection::Rtl, ArrowKey::Right) => {
                Direction::Backward
            }
        }
    }

    pub fn is_rtl(self) -> bool {
        self == TextDirection::Rtl
    }
}

/// Horizontal arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// EditorKey / KeyAction
// ---------------------------------------------------------------------------

/// Keys the editor reacts to, decoupled from any UI toolkit's key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    ArrowLeft,
    ArrowRight,
    Delete,
    Backspace,
    Enter,
    Space,
    Other,
}

/// What a key press means once the reading direction is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move the caret.
    Move(Direction),
    /// Remove the diacritic under the caret (and advance).
    ClearDiacritic,
    /// Start or stop the audio clip.  Handled by the caller.
    PlayAudio,
    /// Not part of the editor's grammar.
    Ignored,
}

impl KeyAction {
    pub fn resolve(key: EditorKey, text_direction: TextDirection) -> Self {
        match key {
            EditorKey::ArrowLeft => KeyAction::Move(text_direction.resolve(ArrowKey::Left)),
            EditorKey::ArrowRight => KeyAction::Move(text_direction.resolve(ArrowKey::Right)),
            EditorKey::Delete | EditorKey::Backspace => KeyAction::ClearDiacritic,
            EditorKey::Enter | EditorKey::Space => KeyAction::PlayAudio,
            EditorKey::Other => KeyAction::Ignored,
        }
    }
}
