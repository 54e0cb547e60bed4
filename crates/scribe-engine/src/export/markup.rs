use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockContent, Document, ImageData};

const STYLESHEET: &str = "body { font-family: Arial, sans-serif; }
pre { white-space: pre-wrap; word-wrap: break-word; }
img { max-width: 100%; height: auto; }";

/// How block text is embedded into markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEscaping {
    /// Entity-escape `&`, `<` and `>`
    #[default]
    Escape,
    /// Insert stored text verbatim, keeping any inline markup the editor
    /// saved in it
    Trusted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub escaping: TextEscaping,
}

impl RenderOptions {
    pub fn trusted() -> Self {
        Self {
            escaping: TextEscaping::Trusted,
        }
    }

    fn text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.escaping {
            TextEscaping::Escape => html_escape::encode_text(text),
            TextEscaping::Trusted => Cow::Borrowed(text),
        }
    }
}

/// Styled intermediate markup for a whole document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    html: String,
}

impl MarkupDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl std::fmt::Display for MarkupDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.html)
    }
}

/// Heading levels outside 1..=6 snap to the nearest valid level
pub fn clamp_heading_level(level: u8) -> u8 {
    level.clamp(1, 6)
}

/// Render a document. Same content always gives byte-identical output.
pub fn render(doc: &Document, options: &RenderOptions) -> MarkupDocument {
    render_blocks(doc.blocks(), options)
}

pub fn render_blocks(blocks: &[Block], options: &RenderOptions) -> MarkupDocument {
    let body = render_body(blocks, options);
    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{STYLESHEET}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    );
    MarkupDocument { html }
}

/// Markup for the blocks alone, in document order
pub fn render_body(blocks: &[Block], options: &RenderOptions) -> String {
    blocks
        .iter()
        .map(|block| render_block(block, options))
        .collect()
}

fn render_block(block: &Block, options: &RenderOptions) -> String {
    match block.content() {
        BlockContent::Paragraph { text } => format!("<p>{}</p>", options.text(text)),
        BlockContent::Heading { level, text } => {
            let level = clamp_heading_level(*level);
            format!("<h{level}>{}</h{level}>", options.text(text))
        }
        BlockContent::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let items: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", options.text(item)))
                .collect();
            format!("<{tag}>{items}</{tag}>")
        }
        BlockContent::Image(image) => render_image(image),
    }
}

fn render_image(image: &ImageData) -> String {
    let mut tag = format!(
        "<img src=\"{}\" alt=\"{}\"",
        html_escape::encode_double_quoted_attribute(&image.url),
        html_escape::encode_double_quoted_attribute(&image.caption),
    );
    if let Some(width) = image.width {
        tag.push_str(&format!(" width=\"{width}\""));
    }
    if let Some(height) = image.height {
        tag.push_str(&format!(" height=\"{height}\""));
    }
    tag.push_str(" />");
    tag
}
