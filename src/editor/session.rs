//! Editing session: the cell sequence plus a caret.
//!
//! [`EditingSession`] is owned by whichever view is showing a task.  Every
//! operation is synchronous and total; inputs that make no sense (clicking a
//! space, moving past either end, editing with nothing selected) are no-ops
//! rather than errors so keystroke handling is never interrupted.

use super::cell::{decompose, recompose, CharCell, Diacritic};
use super::group::{group, WordGroup};
use super::keys::{ArrowKey, Direction, EditorKey, KeyAction, TextDirection};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditingSession {
    cells: Vec<CharCell>,
    selected: Option<usize>,
}

impl EditingSession {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Decompose `source` and place the caret on the first editable cell.
    ///
    /// Behaves identically whether `source` was just fetched or restored
    /// from the task cache.
    pub fn new(source: &str) -> Self {
        Self::from_cells(decompose(source))
    }

    pub fn from_cells(cells: Vec<CharCell>) -> Self {
        let selected = cells.iter().position(|c| !c.is_whitespace());
        log::debug!(
            "editor: session with {} cells, caret at {:?}",
            cells.len(),
            selected
        );
        Self { cells, selected }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn cells(&self) -> &[CharCell] {
        &self.cells
    }

    /// Caret position, `None` when there is no editable cell.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_cell(&self) -> Option<&CharCell> {
        self.selected.and_then(|i| self.cells.get(i))
    }

    /// Word/separator projection for the render surface.
    pub fn groups(&self) -> Vec<WordGroup<'_>> {
        group(&self.cells)
    }

    /// The recomposed string, as it would be submitted.
    pub fn text(&self) -> String {
        recompose(&self.cells)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // -----------------------------------------------------------------------
    // Caret
    // -----------------------------------------------------------------------

    /// Put the caret on `index` unless it is out of range or a space.
    ///
    /// Returns `true` if the caret moved there.
    pub fn select_at(&mut self, index: usize) -> bool {
        match self.cells.get(index) {
            Some(cell) if !cell.is_whitespace() => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Step to the nearest non-space cell in `direction`.
    ///
    /// The caret stays put when no such cell exists.  Returns `true` if it
    /// moved.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let Some(current) = self.selected else {
            return false;
        };

        let mut next = current;
        loop {
            next = match direction {
                Direction::Forward => next + 1,
                Direction::Backward => match next.checked_sub(1) {
                    Some(n) => n,
                    None => return false,
                },
            };
            match self.cells.get(next) {
                None => return false,
                Some(cell) if cell.is_whitespace() => continue,
                Some(_) => {
                    self.selected = Some(next);
                    return true;
                }
            }
        }
    }

    /// Arrow-key movement under the given reading direction.
    pub fn advance_visual(&mut self, arrow: ArrowKey, text_direction: TextDirection) -> bool {
        self.advance(text_direction.resolve(arrow))
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Set (or clear, with `None`) the mark under the caret, then advance.
    ///
    /// Returns `false` without touching anything when there is no caret or
    /// the caret sits on a space.
    pub fn apply_diacritic(&mut self, mark: Option<Diacritic>) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        if cell.is_whitespace() {
            return false;
        }

        cell.diacritic = mark;
        log::debug!(
            "editor: cell {} -> {}",
            index,
            mark.map_or("none", Diacritic::name)
        );
        self.advance(Direction::Forward);
        true
    }

    /// Apply the editing part of a key press and return the resolved action.
    ///
    /// [`KeyAction::PlayAudio`] is left for the caller.
    pub fn handle_key(&mut self, key: EditorKey, text_direction: TextDirection) -> KeyAction {
        let action = KeyAction::resolve(key, text_direction);
        if self.cells.is_empty() {
            return action;
        }
        match action {
            KeyAction::Move(direction) => {
                self.advance(direction);
            }
            KeyAction::ClearDiacritic => {
                self.apply_diacritic(None);
            }
            KeyAction::PlayAudio | KeyAction::Ignored => {}
        }
        action
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
