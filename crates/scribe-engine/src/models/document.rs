use std::sync::Arc;

use crate::editing::EditError;
use crate::models::{Block, BlockContent, BlockId};

/// The in-memory document: an ordered sequence of blocks.
///
/// Blocks live behind an `Arc` so a [`Snapshot`] taken by a reader stays
/// valid and unchanged while the document is spliced. Every mutation builds
/// a fresh block vector and swaps it in as its final step, so no reader can
/// observe a half-applied edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Arc<Vec<Block>>,
    /// Version counter incremented on each committed edit
    pub(crate) version: u64,
}

/// Immutable view of a document at one version
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u64,
    pub blocks: Arc<Vec<Block>>,
}

impl Snapshot {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

impl Document {
    /// Create an empty document holding a single empty paragraph
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(vec![Block::paragraph("")]),
            version: 0,
        }
    }

    /// Create a document from existing blocks. An empty list yields the
    /// default document.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }
        Self {
            blocks: Arc::new(blocks),
            version: 0,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            blocks: Arc::clone(&self.blocks),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by id
    pub fn block(&self, id: BlockId) -> Result<&Block, EditError> {
        self.blocks
            .iter()
            .find(|block| block.id() == id)
            .ok_or(EditError::NotFound(id))
    }

    /// Current position of a block, if it still exists
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id() == id)
    }

    /// Append a block. Used by the editor host, which owns block insertion.
    pub fn push_block(&mut self, content: BlockContent) -> BlockId {
        let block = Block::new(content);
        let id = block.id();
        let mut blocks = (*self.blocks).clone();
        blocks.push(block);
        self.commit(blocks);
        id
    }

    /// Insert a block directly after `after`
    pub fn insert_block_after(
        &mut self,
        after: BlockId,
        content: BlockContent,
    ) -> Result<BlockId, EditError> {
        let index = self.position(after).ok_or(EditError::NotFound(after))?;
        let block = Block::new(content);
        let id = block.id();
        let mut blocks = (*self.blocks).clone();
        blocks.insert(index + 1, block);
        self.commit(blocks);
        Ok(id)
    }

    /// Swap in a new block list and bump the version
    pub(crate) fn commit(&mut self, blocks: Vec<Block>) {
        self.blocks = Arc::new(blocks);
        self.version += 1;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
