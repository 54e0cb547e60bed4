use crate::editing::SelectionAnchor;
use crate::models::BlockId;

/// Result of applying a splice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Blocks whose payload changed, target block first
    pub changed: Vec<BlockId>,
    /// Blocks consumed by a range splice and dropped from the document
    pub removed: Vec<BlockId>,
    /// Position just after the inserted text
    pub caret: SelectionAnchor,
    pub version: u64,
}

impl Patch {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}
