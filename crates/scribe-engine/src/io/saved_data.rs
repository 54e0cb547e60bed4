use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::assist::UploadedFile;
use crate::io::IoError;
use crate::models::{Block, BlockContent, BlockId, Document, ImageData};

/// Top-level shape the block editor produces from `save()`:
/// `{"time": ..., "blocks": [...], "version": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    pub blocks: Vec<SavedBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One saved block. `data` stays untyped until the block type is known so
/// that blocks from unknown tools can be skipped instead of failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Deserialize)]
struct ParagraphData {
    #[serde(default)]
    text: String,
}

fn default_header_level() -> u8 {
    2
}

#[derive(Deserialize)]
struct HeaderData {
    #[serde(default)]
    text: String,
    #[serde(default = "default_header_level")]
    level: u8,
}

#[derive(Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

/// Older list tools save plain strings, newer ones save nested objects
#[derive(Deserialize)]
#[serde(untagged)]
enum ListItem {
    Text(String),
    Nested {
        content: String,
        #[serde(default)]
        items: Vec<ListItem>,
    },
}

impl ListItem {
    fn flatten_into(self, out: &mut Vec<String>) {
        match self {
            ListItem::Text(text) => out.push(text),
            ListItem::Nested { content, items } => {
                out.push(content);
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct ListData {
    #[serde(default)]
    style: ListStyle,
    #[serde(default)]
    items: Vec<ListItem>,
}

#[derive(Deserialize)]
struct ImageBlockData {
    file: UploadedFile,
    #[serde(default)]
    caption: String,
    width: Option<u32>,
    height: Option<u32>,
}

fn decode<T: DeserializeOwned>(
    index: usize,
    saved: &SavedBlock,
) -> Result<T, IoError> {
    T::deserialize(&saved.data).map_err(|source| IoError::InvalidBlock {
        index,
        kind: saved.kind.clone(),
        source,
    })
}

/// Build a document from saved editor data.
///
/// Blocks of a type the model does not know are skipped with a warning.
/// A known type with malformed data fails the whole load.
pub fn from_saved_data(data: &SavedData) -> Result<Document, IoError> {
    let mut blocks = Vec::with_capacity(data.blocks.len());

    let mut seen = HashSet::new();
    for (index, saved) in data.blocks.iter().enumerate() {
        let content = match saved.kind.as_str() {
            "paragraph" => {
                let data: ParagraphData = decode(index, saved)?;
                BlockContent::paragraph(data.text)
            }
            "header" => {
                let data: HeaderData = decode(index, saved)?;
                BlockContent::heading(data.level, data.text)
            }
            "list" => {
                let data: ListData = decode(index, saved)?;
                let mut items = Vec::new();
                for item in data.items {
                    item.flatten_into(&mut items);
                }
                BlockContent::List {
                    ordered: data.style == ListStyle::Ordered,
                    items,
                }
            }
            "image" => {
                let data: ImageBlockData = decode(index, saved)?;
                BlockContent::Image(ImageData {
                    url: data.file.url,
                    caption: data.caption,
                    width: data.width,
                    height: data.height,
                })
            }
            other => {
                log::warn!("Skipping block {index} with unsupported type '{other}'");
                continue;
            }
        };

        let mut id = saved
            .id
            .as_deref()
            .map(BlockId::parse_or_new)
            .unwrap_or_default();
        if !seen.insert(id) {
            log::warn!("Block {index} repeats id {id}, assigning a new one");
            id = BlockId::new();
            seen.insert(id);
        }
        blocks.push(Block::with_id(id, content));
    }

    Ok(Document::from_blocks(blocks))
}

/// Saved editor data for a document, ids included
pub fn to_saved_data(doc: &Document) -> SavedData {
    let blocks = doc
        .blocks()
        .iter()
        .map(|block| {
            let (kind, data) = match block.content() {
                BlockContent::Paragraph { text } => ("paragraph", json!({ "text": text })),
                BlockContent::Heading { level, text } => {
                    ("header", json!({ "text": text, "level": level }))
                }
                BlockContent::List { ordered, items } => {
                    let style = if *ordered { "ordered" } else { "unordered" };
                    ("list", json!({ "style": style, "items": items }))
                }
                BlockContent::Image(image) => ("image", image_data(image)),
            };
            SavedBlock {
                id: Some(block.id().to_string()),
                kind: kind.to_string(),
                data,
            }
        })
        .collect();

    SavedData {
        time: None,
        blocks,
        version: None,
    }
}

fn image_data(image: &ImageData) -> Value {
    let mut data = json!({
        "file": { "url": image.url },
        "caption": image.caption,
    });
    if let Some(width) = image.width {
        data["width"] = width.into();
    }
    if let Some(height) = image.height {
        data["height"] = height.into();
    }
    data
}

pub fn parse_saved_data(json: &str) -> Result<Document, IoError> {
    let data: SavedData = serde_json::from_str(json)?;
    from_saved_data(&data)
}

pub fn saved_data_to_string(doc: &Document) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(&to_saved_data(doc))?)
}
