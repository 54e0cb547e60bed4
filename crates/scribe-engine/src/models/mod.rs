pub mod block;
pub mod document;

pub use block::{Block, BlockContent, BlockId, BlockKind, ImageData};
pub use document::{Document, Snapshot};
