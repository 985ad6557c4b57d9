//! Word grouping for layout.
//!
//! Groups are a read-only projection over the cell slice: they borrow
//! contiguous sub-slices and are rebuilt whenever the view needs them.

use super::cell::CharCell;

/// What a [`WordGroup`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// A maximal run of non-whitespace cells.
    Word,
    /// A single space cell.
    Separator,
}

/// A contiguous, non-empty run of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordGroup<'a> {
    /// Ordinal of the group in the output sequence.
    pub index: usize,
    pub kind: GroupKind,
    pub cells: &'a [CharCell],
}

impl WordGroup<'_> {
    /// Stable key for UI widget ids, e.g. `word-0`, `space-1`.
    pub fn key(&self) -> String {
        match self.kind {
            GroupKind::Word => format!("word-{}", self.index),
            GroupKind::Separator => format!("space-{}", self.index),
        }
    }

    /// Position of the first cell in the group.
    pub fn start(&self) -> usize {
        self.cells.first().map_or(0, |c| c.position)
    }
}

/// Partition `cells` into words and separators, in order.
///
/// ```
/// use vtg_editor::editor::{decompose, group, GroupKind};
///
/// let cells = decompose("ab c");
/// let groups = group(&cells);
/// let kinds: Vec<GroupKind> = groups.iter().map(|g| g.kind).collect();
/// assert_eq!(kinds, [GroupKind::Word, GroupKind::Separator, GroupKind::Word]);
/// ```
pub fn group(cells: &[CharCell]) -> Vec<WordGroup<'_>> {
    let mut groups = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, cell) in cells.iter().enumerate() {
        if !cell.is_whitespace() {
            word_start.get_or_insert(i);
            continue;
        }

        if let Some(start) = word_start.take() {
            groups.push(WordGroup {
                index: groups.len(),
                kind: GroupKind::Word,
                cells: &cells[start..i],
            });
        }
        groups.push(WordGroup {
            index: groups.len(),
            kind: GroupKind::Separator,
            cells: &cells[i..=i],
        });
    }

    if let Some(start) = word_start {
        groups.push(WordGroup {
            index: groups.len(),
            kind: GroupKind::Word,
            cells: &cells[start..],
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::cell::decompose;

    fn shape(s: &str) -> Vec<(GroupKind, usize)> {
        let cells = decompose(s);
        group(&cells)
            .iter()
            .map(|g| (g.kind, g.cells.len()))
            .collect()
    }

    #[test]
    fn empty_sequence_has_no_groups() {
        assert!(group(&[]).is_empty());
    }

    #[test]
    fn single_word_is_one_group() {
        assert_eq!(shape("سلام"), vec![(GroupKind::Word, 4)]);
    }

    #[test]
    fn each_space_is_its_own_separator() {
        assert_eq!(
            shape("ab  c"),
            vec![
                (GroupKind::Word, 2),
                (GroupKind::Separator, 1),
                (GroupKind::Separator, 1),
                (GroupKind::Word, 1),
            ]
        );
    }

    #[test]
    fn leading_and_trailing_spaces() {
        assert_eq!(
            shape(" a "),
            vec![
                (GroupKind::Separator, 1),
                (GroupKind::Word, 1),
                (GroupKind::Separator, 1),
            ]
        );
    }

    #[test]
    fn all_whitespace_is_only_separators() {
        assert!(shape("   ").iter().all(|(k, n)| *k == GroupKind::Separator && *n == 1));
    }

    #[test]
    fn groups_cover_every_cell_once_in_order() {
        let cells = decompose("one two  three four ");
        let flattened: Vec<usize> = group(&cells)
            .iter()
            .flat_map(|g| g.cells.iter().map(|c| c.position))
            .collect();
        let expected: Vec<usize> = (0..cells.len()).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn keys_and_starts_follow_order() {
        let cells = decompose("ab c");
        let groups = group(&cells);
        assert_eq!(groups[0].key(), "word-0");
        assert_eq!(groups[1].key(), "space-1");
        assert_eq!(groups[2].key(), "word-2");
        assert_eq!(groups[2].start(), 3);
    }
}
