use crate::editing::anchors::{char_len, split_at_char};
use crate::editing::{EditError, Patch, SelectionAnchor, SpliceTarget};
use crate::models::{Block, BlockId, BlockKind, Document};

/// An anchor checked against a block list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    block: usize,
    item: Option<usize>,
    offset: usize,
}

impl Position {
    /// Document order
    fn key(&self) -> (usize, usize, usize) {
        (self.block, self.item.unwrap_or(0), self.offset)
    }
}

fn invalid_anchor(block_id: BlockId, reason: impl Into<String>) -> EditError {
    EditError::InvalidAnchor {
        block_id,
        reason: reason.into(),
    }
}

/// Validate `anchor` against `blocks`.
///
/// An image is only accepted as the far end of a range (`allow_image`),
/// where it has a length of one placeholder.
fn locate(
    blocks: &[Block],
    anchor: &SelectionAnchor,
    allow_image: bool,
) -> Result<Position, EditError> {
    let id = anchor.block_id;
    let index = blocks
        .iter()
        .position(|block| block.id() == id)
        .ok_or(EditError::NotFound(id))?;
    let block = &blocks[index];

    let len = match (block.kind(), anchor.item_index) {
        (BlockKind::Image, _) if !allow_image => return Err(EditError::InvalidTarget(id)),
        (BlockKind::Image, None) => 1,
        (BlockKind::List, None) => return Err(invalid_anchor(id, "list anchors need an item index")),
        (BlockKind::List, Some(item)) => block
            .text_at(Some(item))
            .map(char_len)
            .ok_or_else(|| invalid_anchor(id, format!("list item {item} does not exist")))?,
        (_, Some(item)) => {
            return Err(invalid_anchor(
                id,
                format!("item index {item} on a block without items"),
            ));
        }
        (_, None) => block.text_at(None).map(char_len).unwrap_or_default(),
    };

    if anchor.offset > len {
        return Err(invalid_anchor(
            id,
            format!("offset {} exceeds length {len}", anchor.offset),
        ));
    }

    Ok(Position {
        block: index,
        item: anchor.item_index,
        offset: anchor.offset,
    })
}

/// Remaining text of the end position once everything before it is deleted
fn suffix_of(blocks: &[Block], end: Position) -> String {
    blocks[end.block]
        .text_at(end.item)
        .map(|text| split_at_char(text, end.offset).1.to_string())
        .unwrap_or_default()
}

/// Delete everything between `start` and `end`, leaving `start` pointing at
/// the join. Returns the ids of blocks that no longer exist and of the end
/// block when it survives with fewer items.
fn delete_between(
    blocks: &mut Vec<Block>,
    start: Position,
    end: Position,
) -> (Vec<BlockId>, Option<BlockId>) {
    let suffix = suffix_of(blocks, end);
    let mut removed = Vec::new();
    let mut end_changed = None;
    let mut drop_end = false;

    if start.block == end.block {
        let block = &mut blocks[start.block];
        if let (Some(first), Some(last)) = (start.item, end.item)
            && first != last
            && let Some(items) = block.items_mut()
        {
            items.drain(first + 1..=last);
        }
    } else {
        if let (Some(first), Some(items)) = (start.item, blocks[start.block].items_mut()) {
            items.truncate(first + 1);
        }

        removed.extend(blocks[start.block + 1..end.block].iter().map(Block::id));

        let end_block = &mut blocks[end.block];
        let end_id = end_block.id();
        let consumed = match (end_block.kind(), end.item) {
            (BlockKind::Image, _) => end.offset > 0,
            (BlockKind::List, Some(last)) => match end_block.items_mut() {
                Some(items) => {
                    items.drain(..=last);
                    items.is_empty()
                }
                None => true,
            },
            _ => true,
        };
        if consumed {
            removed.push(end_id);
        } else if end_block.kind() == BlockKind::List {
            end_changed = Some(end_id);
        }
        drop_end = consumed;
    }

    if let Some(text) = blocks[start.block].text_mut(start.item) {
        let prefix = split_at_char(text, start.offset).0.to_string();
        *text = prefix + &suffix;
    }

    // Remove by position; ids are not assumed unique here
    if start.block != end.block {
        let last = if drop_end { end.block + 1 } else { end.block };
        blocks.drain(start.block + 1..last);
    }
    (removed, end_changed)
}

fn insert_at(blocks: &mut [Block], at: Position, insertion: &str) {
    if let Some(text) = blocks[at.block].text_mut(at.item) {
        let (prefix, suffix) = split_at_char(text, at.offset);
        *text = [prefix, insertion, suffix].concat();
    }
}

impl Document {
    /// Insert `text` at a point, or replace a range with it.
    ///
    /// All anchors are validated before anything is touched; on error the
    /// document is unchanged. The target block keeps its id and kind. A range
    /// spanning blocks merges the tail of the end block into the start block
    /// and drops every block it fully consumed.
    pub fn splice(&mut self, target: &SpliceTarget, text: &str) -> Result<Patch, EditError> {
        let (start, end) = match target {
            SpliceTarget::Point(anchor) => {
                let position = locate(&self.blocks, anchor, false)?;
                (position, position)
            }
            SpliceTarget::Range { start, end } => {
                let a = locate(&self.blocks, start, true)?;
                let b = locate(&self.blocks, end, true)?;
                let (first, last) = if b.key() < a.key() { (b, a) } else { (a, b) };
                let first_block = &self.blocks[first.block];
                if first_block.kind() == BlockKind::Image {
                    return Err(EditError::InvalidTarget(first_block.id()));
                }
                (first, last)
            }
        };

        let target_id = self.blocks[start.block].id();
        let caret = SelectionAnchor {
            block_id: target_id,
            item_index: start.item,
            offset: start.offset + char_len(text),
        };

        if start == end && text.is_empty() {
            return Ok(Patch {
                changed: Vec::new(),
                removed: Vec::new(),
                caret,
                version: self.version,
            });
        }

        let mut blocks = (*self.blocks).clone();
        let (removed, end_changed) = if start == end {
            (Vec::new(), None)
        } else {
            delete_between(&mut blocks, start, end)
        };
        insert_at(&mut blocks, start, text);

        let mut changed = vec![target_id];
        changed.extend(end_changed);

        self.commit(blocks);
        log::debug!(
            "spliced {} chars into block {target_id}, removed {} blocks (version {})",
            char_len(text),
            removed.len(),
            self.version
        );

        Ok(Patch {
            changed,
            removed,
            caret,
            version: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockContent, ImageData};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn texts(doc: &Document) -> Vec<String> {
        doc.blocks()
            .iter()
            .map(|block| match block.content() {
                BlockContent::List { items, .. } => items.join("|"),
                BlockContent::Image(image) => format!("<{}>", image.url),
                _ => block.text().unwrap_or_default().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_point_insert_into_paragraph() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("Hello world")]);
        let id = doc.blocks()[0].id();

        let patch = doc
            .splice(&SelectionAnchor::new(id, 5).into(), " there")
            .unwrap();

        assert_eq!(doc.blocks()[0].text(), Some("Hello there world"));
        assert_eq!(doc.blocks()[0].id(), id);
        assert_eq!(patch.changed, vec![id]);
        assert_eq!(patch.caret, SelectionAnchor::new(id, 11));
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_point_insert_into_list_item() {
        let mut doc = Document::from_blocks(vec![Block::list(false, ["a", "b"])]);
        let id = doc.blocks()[0].id();

        doc.splice(&SelectionAnchor::in_item(id, 1, 1).into(), "x")
            .unwrap();

        assert_eq!(doc.blocks()[0].items(), Some(&["a".to_string(), "bx".to_string()][..]));
        assert_eq!(doc.blocks()[0].id(), id);
        assert_eq!(doc.blocks()[0].kind(), BlockKind::List);
    }

    #[test]
    fn test_heading_keeps_level() {
        let mut doc = Document::from_blocks(vec![Block::heading(3, "Intro")]);
        let id = doc.blocks()[0].id();

        doc.splice(&SelectionAnchor::new(id, 0).into(), "An ")
            .unwrap();

        assert_eq!(doc.blocks()[0].content(), &BlockContent::heading(3, "An Intro"));
    }

    #[test]
    fn test_empty_point_splice_is_noop() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("Hello")]);
        let id = doc.blocks()[0].id();
        let before = doc.snapshot();

        let patch = doc.splice(&SelectionAnchor::new(id, 2).into(), "").unwrap();

        assert!(patch.is_noop());
        assert_eq!(doc.version(), 0);
        assert!(Arc::ptr_eq(&before.blocks, &doc.snapshot().blocks));
    }

    #[test]
    fn test_range_within_paragraph_replaces() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("Hello world")]);
        let id = doc.blocks()[0].id();

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(id, 6),
                end: SelectionAnchor::new(id, 11),
            },
            "there",
        )
        .unwrap();

        assert_eq!(texts(&doc), vec!["Hello there"]);
    }

    #[test]
    fn test_range_removes_blocks_by_position_not_id() {
        let shared = BlockId::new();
        let mut doc = Document::from_blocks(vec![
            Block::with_id(shared, BlockContent::paragraph("Hello")),
            Block::with_id(shared, BlockContent::paragraph("mid")),
            Block::paragraph("World"),
        ]);
        let last = doc.blocks()[2].id();

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(shared, 2),
                end: SelectionAnchor::new(last, 2),
            },
            "!",
        )
        .unwrap();

        assert_eq!(texts(&doc), vec!["He!rld"]);
        assert_eq!(doc.blocks()[0].id(), shared);
    }

    #[test]
    fn test_reversed_range_is_ordered() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("Hello world")]);
        let id = doc.blocks()[0].id();

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(id, 11),
                end: SelectionAnchor::new(id, 6),
            },
            "there",
        )
        .unwrap();

        assert_eq!(texts(&doc), vec!["Hello there"]);
    }

    #[test]
    fn test_range_across_two_paragraphs_collapses() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("Hello"), Block::paragraph("World")]);
        let first = doc.blocks()[0].id();
        let second = doc.blocks()[1].id();

        let patch = doc
            .splice(
                &SpliceTarget::Range {
                    start: SelectionAnchor::new(first, 0),
                    end: SelectionAnchor::new(second, 5),
                },
                "Hi",
            )
            .unwrap();

        assert_eq!(texts(&doc), vec!["Hi"]);
        assert_eq!(doc.blocks()[0].id(), first);
        assert_eq!(patch.removed, vec![second]);
        assert_eq!(doc.block(second), Err(EditError::NotFound(second)));
    }

    #[test]
    fn test_range_merges_tail_and_drops_interior() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("keep this"),
            Block::heading(2, "gone"),
            Block::image(ImageData::new("gone.png")),
            Block::paragraph("also gone, tail"),
            Block::paragraph("untouched"),
        ]);
        let ids: Vec<_> = doc.blocks().iter().map(Block::id).collect();

        let patch = doc
            .splice(
                &SpliceTarget::Range {
                    start: SelectionAnchor::new(ids[0], 5),
                    end: SelectionAnchor::new(ids[3], 11),
                },
                "",
            )
            .unwrap();

        assert_eq!(texts(&doc), vec!["keep tail", "untouched"]);
        assert_eq!(patch.removed, vec![ids[1], ids[2], ids[3]]);
    }

    #[test]
    fn test_range_across_list_items_in_one_block() {
        let mut doc = Document::from_blocks(vec![Block::list(true, ["alpha", "beta", "gamma", "delta"])]);
        let id = doc.blocks()[0].id();

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::in_item(id, 0, 2),
                end: SelectionAnchor::in_item(id, 2, 3),
            },
            "-",
        )
        .unwrap();

        assert_eq!(texts(&doc), vec!["al-ma|delta"]);
        assert_eq!(doc.blocks()[0].id(), id);
    }

    #[test]
    fn test_range_from_list_into_paragraph() {
        let mut doc = Document::from_blocks(vec![
            Block::list(false, ["one", "two", "three"]),
            Block::paragraph("after"),
        ]);
        let list = doc.blocks()[0].id();
        let paragraph = doc.blocks()[1].id();

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::in_item(list, 1, 1),
                end: SelectionAnchor::new(paragraph, 2),
            },
            "",
        )
        .unwrap();

        assert_eq!(texts(&doc), vec!["one|tter"]);
    }

    #[test]
    fn test_range_into_list_keeps_remaining_items() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("start"),
            Block::list(false, ["one", "two", "three"]),
        ]);
        let paragraph = doc.blocks()[0].id();
        let list = doc.blocks()[1].id();

        let patch = doc
            .splice(
                &SpliceTarget::Range {
                    start: SelectionAnchor::new(paragraph, 5),
                    end: SelectionAnchor::in_item(list, 1, 1),
                },
                " ",
            )
            .unwrap();

        assert_eq!(texts(&doc), vec!["start wo", "three"]);
        assert_eq!(patch.changed, vec![paragraph, list]);
        assert!(patch.removed.is_empty());
    }

    #[test]
    fn test_range_ending_on_image() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("text"),
            Block::image(ImageData::new("a.png")),
            Block::image(ImageData::new("b.png")),
        ]);
        let ids: Vec<_> = doc.blocks().iter().map(Block::id).collect();

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(ids[0], 2),
                end: SelectionAnchor::new(ids[1], 1),
            },
            "",
        )
        .unwrap();
        assert_eq!(texts(&doc), vec!["te", "<b.png>"]);

        doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(ids[0], 0),
                end: SelectionAnchor::new(ids[2], 0),
            },
            "x",
        )
        .unwrap();
        assert_eq!(texts(&doc), vec!["x", "<b.png>"]);
    }

    #[test]
    fn test_splice_into_image_is_invalid_target() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("text"),
            Block::image(ImageData::new("a.png")),
        ]);
        let image = doc.blocks()[1].id();
        let before = doc.snapshot();

        let point = doc.splice(&SelectionAnchor::new(image, 0).into(), "x");
        let range = doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(image, 0),
                end: SelectionAnchor::new(image, 1),
            },
            "x",
        );

        assert_eq!(point, Err(EditError::InvalidTarget(image)));
        assert_eq!(range, Err(EditError::InvalidTarget(image)));
        assert!(Arc::ptr_eq(&before.blocks, &doc.snapshot().blocks));
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_missing_block_is_not_found() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("text")]);
        let missing = BlockId::new();

        assert_eq!(
            doc.splice(&SelectionAnchor::new(missing, 0).into(), "x"),
            Err(EditError::NotFound(missing))
        );
    }

    #[test]
    fn test_invalid_anchors_leave_document_unchanged() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("abc"),
            Block::list(false, ["x"]),
        ]);
        let paragraph = doc.blocks()[0].id();
        let list = doc.blocks()[1].id();
        let before = doc.clone();

        let attempts = [
            SelectionAnchor::new(paragraph, 4),
            SelectionAnchor::in_item(paragraph, 0, 0),
            SelectionAnchor::new(list, 0),
            SelectionAnchor::in_item(list, 1, 0),
            SelectionAnchor::in_item(list, 0, 2),
        ];
        for anchor in attempts {
            let result = doc.splice(&anchor.into(), "z");
            assert!(
                matches!(result, Err(EditError::InvalidAnchor { .. })),
                "{anchor:?} gave {result:?}"
            );
        }

        assert_eq!(doc, before);
    }

    #[test]
    fn test_range_with_bad_end_leaves_document_unchanged() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("Hello"), Block::paragraph("World")]);
        let first = doc.blocks()[0].id();
        let before = doc.clone();

        let result = doc.splice(
            &SpliceTarget::Range {
                start: SelectionAnchor::new(first, 0),
                end: SelectionAnchor::new(BlockId::new(), 1),
            },
            "Hi",
        );

        assert!(matches!(result, Err(EditError::NotFound(_))));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_codepoint_offsets() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("世界🦀")]);
        let id = doc.blocks()[0].id();

        doc.splice(&SelectionAnchor::new(id, 2).into(), "!").unwrap();

        assert_eq!(doc.blocks()[0].text(), Some("世界!🦀"));
    }
}
