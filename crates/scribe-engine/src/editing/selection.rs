use std::collections::HashSet;

use crate::assist::CompletionRequest;
use crate::editing::anchors::char_len;
use crate::editing::{EditError, SelectionAnchor, SpliceTarget};
use crate::models::{Block, BlockContent, BlockId, Document};

/// Stand-in character occupying an image's slot in the rendered view
pub const OBJECT_PLACEHOLDER: char = '\u{FFFC}';

/// The user's highlighted range as reported by the UI layer.
///
/// Both ends are codepoint offsets into the rendered [`TextView`]. `anchor`
/// is where the drag started and `focus` where it ended, so `focus` may
/// come first for a backwards selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSelection {
    pub anchor: usize,
    pub focus: usize,
}

impl LiveSelection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// The selection as `(start, end)` in view order
    pub fn ordered(&self) -> (usize, usize) {
        (self.anchor.min(self.focus), self.anchor.max(self.focus))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A live selection translated into model coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    /// Range covering the highlighted content
    pub target: SpliceTarget,
    /// Highlighted text with surrounding whitespace trimmed. Never empty.
    pub selected_text: String,
    /// Last text position of the selection, for inserting after it
    pub end_of_text: SelectionAnchor,
}

impl ResolvedSelection {
    /// Point target just after the selection, for continuation-style edits
    pub fn continuation_point(&self) -> SpliceTarget {
        SpliceTarget::Point(self.end_of_text)
    }

    pub fn request(&self) -> CompletionRequest {
        CompletionRequest::new(self.selected_text.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ViewSegment {
    block_id: BlockId,
    item_index: Option<usize>,
    start: usize,
    len: usize,
    is_object: bool,
}

impl ViewSegment {
    fn end(&self) -> usize {
        self.start + self.len
    }

    fn anchor(&self, offset: usize) -> SelectionAnchor {
        SelectionAnchor {
            block_id: self.block_id,
            item_index: self.item_index,
            offset,
        }
    }
}

/// Plain-text projection of a document as the user sees it.
///
/// Each paragraph, heading and list item is one segment; segments are
/// separated by a single `'\n'`. Images take one [`OBJECT_PLACEHOLDER`]
/// codepoint and contribute no text to a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    text: String,
    segments: Vec<ViewSegment>,
    len: usize,
}

impl TextView {
    pub fn new(blocks: &[Block]) -> Self {
        let mut view = Self {
            text: String::new(),
            segments: Vec::new(),
            len: 0,
        };

        for block in blocks {
            match block.content() {
                BlockContent::Paragraph { text } | BlockContent::Heading { text, .. } => {
                    view.push_segment(block.id(), None, text, false);
                }
                BlockContent::List { items, .. } => {
                    for (index, item) in items.iter().enumerate() {
                        view.push_segment(block.id(), Some(index), item, false);
                    }
                }
                BlockContent::Image(_) => {
                    let mut placeholder = [0u8; 4];
                    let placeholder = OBJECT_PLACEHOLDER.encode_utf8(&mut placeholder);
                    view.push_segment(block.id(), None, placeholder, true);
                }
            }
        }

        view
    }

    pub fn of(doc: &Document) -> Self {
        Self::new(doc.blocks())
    }

    fn push_segment(
        &mut self,
        block_id: BlockId,
        item_index: Option<usize>,
        text: &str,
        is_object: bool,
    ) {
        if !self.segments.is_empty() {
            self.text.push('\n');
            self.len += 1;
        }
        let len = char_len(text);
        self.segments.push(ViewSegment {
            block_id,
            item_index,
            start: self.len,
            len,
            is_object,
        });
        self.text.push_str(text);
        self.len += len;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the view in codepoints
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn segment_at(&self, offset: usize) -> Result<usize, EditError> {
        self.segments
            .iter()
            .position(|segment| segment.start <= offset && offset <= segment.end())
            .ok_or(EditError::OutOfView {
                offset,
                len: self.len,
            })
    }

    /// Map a view offset to a logical anchor. An offset at the end of a
    /// segment belongs to that segment, not to the separator after it.
    pub fn locate(&self, offset: usize) -> Result<SelectionAnchor, EditError> {
        let index = self.segment_at(offset)?;
        let segment = &self.segments[index];
        Ok(segment.anchor(offset - segment.start))
    }

    /// Text between two view offsets, skipping image placeholders
    fn text_between(&self, start: usize, end: usize) -> String {
        let objects: HashSet<usize> = self
            .segments
            .iter()
            .filter(|segment| segment.is_object)
            .map(|segment| segment.start)
            .collect();

        self.text
            .chars()
            .enumerate()
            .skip(start)
            .take(end - start)
            .filter(|(position, _)| !objects.contains(position))
            .map(|(_, c)| c)
            .collect()
    }

    /// Translate a live selection into model anchors.
    ///
    /// Pure: the result depends only on the view and the selection.
    pub fn resolve(&self, selection: &LiveSelection) -> Result<ResolvedSelection, EditError> {
        let (from, to) = selection.ordered();
        let mut start_index = self.segment_at(from)?;
        let mut end_index = self.segment_at(to)?;

        let selected_text = self.text_between(from, to).trim().to_string();
        if selected_text.is_empty() {
            return Err(EditError::EmptySelection);
        }

        // Images can't host the splice point: start on the next text segment
        let mut start_offset = from - self.segments[start_index].start;
        while self.segments[start_index].is_object {
            start_index += 1;
            start_offset = 0;
            if start_index > end_index {
                return Err(EditError::EmptySelection);
            }
        }

        let end_segment = &self.segments[end_index];
        let end = end_segment.anchor(to - end_segment.start);

        let mut end_of_text = end;
        while self.segments[end_index].is_object && end_index > start_index {
            end_index -= 1;
            let segment = &self.segments[end_index];
            end_of_text = segment.anchor(segment.len);
        }

        Ok(ResolvedSelection {
            target: SpliceTarget::Range {
                start: self.segments[start_index].anchor(start_offset),
                end,
            },
            selected_text,
            end_of_text,
        })
    }
}

/// Resolve the UI selection against the current document content
pub fn resolve_selection(
    doc: &Document,
    selection: &LiveSelection,
) -> Result<ResolvedSelection, EditError> {
    TextView::of(doc).resolve(selection)
}
