/*!
 * # Editing Core
 *
 * Everything that turns a user's on-screen selection into a change of the
 * block model lives here.
 *
 * ## Flow
 *
 * 1. The UI host captures its live selection as a [`LiveSelection`]: two
 *    codepoint offsets into the rendered text view of the document.
 * 2. [`resolve_selection`] translates it into logical [`SelectionAnchor`]s
 *    (`{block_id, item_index, offset}`) and the selected text. This happens
 *    **before** any asynchronous call; the anchors captured here are the
 *    authoritative splice location, the live UI selection is never
 *    consulted again.
 * 3. [`Document::splice`](crate::models::Document::splice) commits the
 *    replacement text at the captured [`SpliceTarget`] and returns a
 *    [`Patch`].
 *
 * ## Module Structure
 *
 * - **`anchors`**: logical locations and codepoint helpers
 * - **`selection`**: rendered text view and the selection resolver
 * - **`splice`**: the atomic insert/replace operation
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use scribe_engine::editing::*;
 * use scribe_engine::models::{Block, Document};
 *
 * let mut doc = Document::from_blocks(vec![Block::paragraph("Hello world")]);
 *
 * // User highlighted "world"
 * let resolved = resolve_selection(&doc, &LiveSelection::new(6, 11)).unwrap();
 * assert_eq!(resolved.selected_text, "world");
 *
 * let patch = doc.splice(&resolved.target, "there").unwrap();
 * assert_eq!(doc.blocks()[0].text(), Some("Hello there"));
 * assert_eq!(patch.version, 1);
 * ```
 */

pub mod anchors;
pub mod patch;
pub mod selection;
pub mod splice;

pub use anchors::{SelectionAnchor, SpliceTarget};
pub use patch::Patch;
pub use selection::{LiveSelection, ResolvedSelection, TextView, resolve_selection};

use crate::models::BlockId;

/// Errors raised by model-layer operations.
///
/// None of them leave the document modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Selection is empty")]
    EmptySelection,
    #[error("Block {0} is not a text block and cannot be spliced")]
    InvalidTarget(BlockId),
    #[error("Block {0} not found")]
    NotFound(BlockId),
    #[error("Invalid anchor in block {block_id}: {reason}")]
    InvalidAnchor { block_id: BlockId, reason: String },
    #[error("Offset {offset} is outside the rendered view (length {len})")]
    OutOfView { offset: usize, len: usize },
}
