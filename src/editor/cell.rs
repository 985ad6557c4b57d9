//! Character cells and the decompose / recompose pair.
//!
//! A source string such as `"سَلام"` is a flat run of base letters with
//! zero-width combining marks interleaved.  [`decompose`] turns it into one
//! [`CharCell`] per base character, each carrying at most one
//! [`Diacritic`]; [`recompose`] is the inverse used on submission.
//!
//! ```text
//! "س" U+064E "ل" "ا" "م"
//!   │    │     │   │   │
//!   └──┬─┘     │   │   │
//!   cell 0   cell 1 2  3
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Diacritic
// ---------------------------------------------------------------------------

/// The three short-vowel combining marks the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diacritic {
    /// U+064E ARABIC FATHA.
    Fatha,
    /// U+064F ARABIC DAMMA.
    Damma,
    /// U+0650 ARABIC KASRA.
    Kasra,
}

impl Diacritic {
    /// Marks in toolbar order.
    pub const ALL: [Diacritic; 3] = [Diacritic::Damma, Diacritic::Kasra, Diacritic::Fatha];

    /// Map a code point to a recognised mark.
    ///
    /// ```
    /// use vtg_editor::editor::Diacritic;
    ///
    /// assert_eq!(Diacritic::from_char('\u{064E}'), Some(Diacritic::Fatha));
    /// assert_eq!(Diacritic::from_char('\u{0651}'), None); // shadda is not handled
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\u{064E}' => Some(Diacritic::Fatha),
            '\u{064F}' => Some(Diacritic::Damma),
            '\u{0650}' => Some(Diacritic::Kasra),
            _ => None,
        }
    }

    /// The combining code point for this mark.
    pub fn as_char(self) -> char {
        match self {
            Diacritic::Fatha => '\u{064E}',
            Diacritic::Damma => '\u{064F}',
            Diacritic::Kasra => '\u{0650}',
        }
    }

    /// Upper-case name as used in logs and key bindings.
    pub fn name(self) -> &'static str {
        match self {
            Diacritic::Fatha => "FATHA",
            Diacritic::Damma => "DAMMA",
            Diacritic::Kasra => "KASRA",
        }
    }
}

impl fmt::Display for Diacritic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns `true` if `c` is one of the recognised combining marks.
#[inline]
pub fn is_diacritic(c: char) -> bool {
    Diacritic::from_char(c).is_some()
}

// ---------------------------------------------------------------------------
// CellId
// ---------------------------------------------------------------------------

/// Stable identity of a cell.  Drawn from a process-wide counter, so ids are
/// never handed out twice even when a session is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(0);

impl CellId {
    fn next() -> Self {
        CellId(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, used to build UI widget ids.
    pub fn get(self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// CharCell
// ---------------------------------------------------------------------------

/// One editable unit: a base character and an optional attached mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCell {
    /// Identity assigned by [`decompose`].
    pub id: CellId,
    /// Exactly one non-combining character (may be a space).
    pub base: char,
    /// The attached mark, if any.  Always `None` on whitespace cells.
    pub diacritic: Option<Diacritic>,
    /// Index into the owning sequence.
    pub position: usize,
}

impl CharCell {
    fn new(base: char, position: usize) -> Self {
        Self {
            id: CellId::next(),
            base,
            diacritic: None,
            position,
        }
    }

    /// Only the ASCII space counts; other whitespace is an ordinary letter
    /// as far as selection and grouping go.
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.base == ' '
    }

    /// Base character followed by its mark, ready for display.
    pub fn render(&self) -> String {
        let mut s = String::with_capacity(8);
        s.push(self.base);
        if let Some(d) = self.diacritic {
            s.push(d.as_char());
        }
        s
    }
}

// ---------------------------------------------------------------------------
// decompose / recompose
// ---------------------------------------------------------------------------

/// Split `source` into character cells.
///
/// A recognised mark attaches to the most recently emitted cell, replacing
/// whatever mark it had.  A mark seen before any cell exists is dropped.
/// Marks that follow a space are dropped as well, since whitespace cells
/// never carry a diacritic.
///
/// ```
/// use vtg_editor::editor::{decompose, Diacritic};
///
/// let cells = decompose("\u{0628}\u{064E} \u{062A}");
/// assert_eq!(cells.len(), 3);
/// assert_eq!(cells[0].diacritic, Some(Diacritic::Fatha));
/// assert!(cells[1].is_whitespace());
/// ```
pub fn decompose(source: &str) -> Vec<CharCell> {
    let mut cells: Vec<CharCell> = Vec::with_capacity(source.len());

    for c in source.chars() {
        match Diacritic::from_char(c) {
            Some(mark) => match cells.last_mut() {
                Some(last) if !last.is_whitespace() => last.diacritic = Some(mark),
                Some(_) => log::trace!("decompose: dropping {mark} after a space"),
                None => log::trace!("decompose: dropping leading {mark}"),
            },
            None => {
                let position = cells.len();
                cells.push(CharCell::new(c, position));
            }
        }
    }

    cells
}

/// Serialise cells back into the flat combining-character form.
pub fn recompose(cells: &[CharCell]) -> String {
    let mut out = String::with_capacity(cells.len() * 4);
    for cell in cells {
        out.push(cell.base);
        if let Some(d) = cell.diacritic {
            out.push(d.as_char());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
