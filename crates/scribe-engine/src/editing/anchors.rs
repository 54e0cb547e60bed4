use crate::models::BlockId;

/// Logical location inside the block model.
///
/// `offset` counts Unicode scalar values (codepoints) into the addressed
/// text: the whole text of a paragraph or heading, or one item of a list
/// when `item_index` is set. Anchors are derived fresh for every request
/// and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionAnchor {
    pub block_id: BlockId,
    pub item_index: Option<usize>,
    pub offset: usize,
}

impl SelectionAnchor {
    pub fn new(block_id: BlockId, offset: usize) -> Self {
        Self {
            block_id,
            item_index: None,
            offset,
        }
    }

    pub fn in_item(block_id: BlockId, item_index: usize, offset: usize) -> Self {
        Self {
            block_id,
            item_index: Some(item_index),
            offset,
        }
    }
}

/// Where a splice applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceTarget {
    Point(SelectionAnchor),
    /// Content between the anchors is deleted first, then the splice
    /// continues as a point splice at `start`
    Range {
        start: SelectionAnchor,
        end: SelectionAnchor,
    },
}

impl SpliceTarget {
    pub fn start(&self) -> SelectionAnchor {
        match self {
            Self::Point(anchor) => *anchor,
            Self::Range { start, .. } => *start,
        }
    }
}

impl From<SelectionAnchor> for SpliceTarget {
    fn from(anchor: SelectionAnchor) -> Self {
        Self::Point(anchor)
    }
}

/// Number of codepoints in `text`
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the codepoint at `offset`, `None` past the end
pub(crate) fn byte_index(text: &str, offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .nth(offset)
}

/// Split `text` at a codepoint offset. Offsets past the end clamp.
pub(crate) fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(byte_index(text, offset).unwrap_or(text.len()))
}
