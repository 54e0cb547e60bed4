use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::models::{Block, Document, ImageData};

/// Import Markdown as a block document.
///
/// Only the block shapes the editor knows survive: paragraphs, headings,
/// lists and images. Inline formatting is reduced to its text, nested list
/// items are flattened into their top-level list, code blocks become
/// paragraphs, and a paragraph holding only images becomes image blocks.
pub fn parse_markdown(markdown: &str) -> Document {
    let mut importer = MarkdownImporter::default();
    for event in Parser::new(markdown) {
        importer.process_event(event);
    }
    importer.flush_images();
    Document::from_blocks(importer.blocks)
}

struct ListState {
    ordered: bool,
    items: Vec<String>,
    /// Nesting depth of the list currently open inside this block
    depth: usize,
}

#[derive(Default)]
struct MarkdownImporter {
    blocks: Vec<Block>,

    /// Text of the paragraph, heading or list item being read
    text: String,

    /// Images completed in the current paragraph
    images: Vec<ImageData>,

    /// Image whose alt text is being read
    image: Option<ImageData>,

    /// Top-level list being collected, if any
    list: Option<ListState>,
}

impl MarkdownImporter {
    fn in_list(&self) -> bool {
        self.list.is_some()
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::Paragraph) => {
                // Loose list items hold several paragraphs
                if self.in_list() && !self.text.is_empty() {
                    self.text.push(' ');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if !self.in_list() {
                    self.flush_paragraph();
                }
            }
            Event::End(TagEnd::Heading(level)) => {
                if !self.in_list() {
                    let text = take_trimmed(&mut self.text);
                    self.blocks.push(Block::heading(level as u8, text));
                    self.flush_images();
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if !self.in_list() {
                    let code = std::mem::take(&mut self.text);
                    self.blocks
                        .push(Block::paragraph(code.trim_end_matches('\n')));
                }
            }
            Event::Start(Tag::List(first_number)) => match self.list.as_mut() {
                Some(list) => {
                    list.depth += 1;
                    self.flush_item();
                }
                None => {
                    self.list = Some(ListState {
                        ordered: first_number.is_some(),
                        items: Vec::new(),
                        depth: 1,
                    });
                }
            },
            Event::End(TagEnd::List(_)) => {
                self.flush_item();
                let closed = self.list.as_mut().is_some_and(|list| {
                    list.depth -= 1;
                    list.depth == 0
                });
                if closed && let Some(list) = self.list.take() {
                    self.blocks.push(Block::list(list.ordered, list.items));
                }
            }
            Event::Start(Tag::Item) | Event::End(TagEnd::Item) => {
                self.flush_item();
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                if !self.in_list() {
                    self.image = Some(ImageData::new(dest_url.to_string()));
                }
            }
            Event::End(TagEnd::Image) => {
                if let Some(image) = self.image.take() {
                    self.images.push(image);
                }
            }
            Event::Text(text) | Event::Code(text) | Event::InlineHtml(text) => {
                self.push_text(&text)
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_text("\n"),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.image.as_mut() {
            Some(image) => image.caption.push_str(text),
            None => self.text.push_str(text),
        }
    }

    fn flush_paragraph(&mut self) {
        let text = take_trimmed(&mut self.text);
        if !text.is_empty() {
            self.blocks.push(Block::paragraph(text));
        }
        self.flush_images();
    }

    /// Images follow the block they were written in
    fn flush_images(&mut self) {
        self.blocks
            .extend(std::mem::take(&mut self.images).into_iter().map(Block::image));
    }

    fn flush_item(&mut self) {
        let text = take_trimmed(&mut self.text);
        if !text.is_empty()
            && let Some(list) = self.list.as_mut()
        {
            list.items.push(text);
        }
    }
}

fn take_trimmed(text: &mut String) -> String {
    let trimmed = text.trim().to_string();
    text.clear();
    trimmed
}
