use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a block, independent of its position in the document
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form, minting a fresh one when the input
    /// is not a UUID (ids written by other editors are short random strings)
    pub fn parse_or_new(raw: &str) -> Self {
        Uuid::parse_str(raw).map(Self).unwrap_or_else(|_| Self::new())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The variant tag of a block. Fixed for the lifetime of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading,
    List,
    Image,
}

/// Payload of an image block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
    pub caption: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Typed block payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Paragraph { text: String },
    /// Heading level as stored; renderers clamp it to 1..=6
    Heading { level: u8, text: String },
    List { ordered: bool, items: Vec<String> },
    Image(ImageData),
}

impl BlockContent {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn list<I, S>(ordered: bool, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List {
            ordered,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph { .. } => BlockKind::Paragraph,
            Self::Heading { .. } => BlockKind::Heading,
            Self::List { .. } => BlockKind::List,
            Self::Image(_) => BlockKind::Image,
        }
    }
}

/// One typed unit of document content.
///
/// The id and the variant tag are fixed at construction. Only the payload
/// text can change afterwards, and only through the splice engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    content: BlockContent,
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Self::with_id(BlockId::new(), content)
    }

    pub fn with_id(id: BlockId, content: BlockContent) -> Self {
        Self { id, content }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockContent::paragraph(text))
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(BlockContent::heading(level, text))
    }

    pub fn list<I, S>(ordered: bool, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(BlockContent::list(ordered, items))
    }

    pub fn image(data: ImageData) -> Self {
        Self::new(BlockContent::Image(data))
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    /// Text of a paragraph or heading block
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Paragraph { text } | BlockContent::Heading { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Items of a list block
    pub fn items(&self) -> Option<&[String]> {
        match &self.content {
            BlockContent::List { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the text addressed by `item_index`.
    ///
    /// Paragraphs and headings take `None`, lists take `Some(item)`. Images
    /// never yield text.
    pub(crate) fn text_mut(&mut self, item_index: Option<usize>) -> Option<&mut String> {
        match (&mut self.content, item_index) {
            (BlockContent::Paragraph { text }, None)
            | (BlockContent::Heading { text, .. }, None) => Some(text),
            (BlockContent::List { items, .. }, Some(index)) => items.get_mut(index),
            _ => None,
        }
    }

    pub(crate) fn items_mut(&mut self) -> Option<&mut Vec<String>> {
        match &mut self.content {
            BlockContent::List { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Text addressed by `item_index`, see [`Block::text_mut`]
    pub fn text_at(&self, item_index: Option<usize>) -> Option<&str> {
        match (&self.content, item_index) {
            (BlockContent::Paragraph { text }, None)
            | (BlockContent::Heading { text, .. }, None) => Some(text),
            (BlockContent::List { items, .. }, Some(index)) => items.get(index).map(String::as_str),
            _ => None,
        }
    }
}

impl ImageData {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}
