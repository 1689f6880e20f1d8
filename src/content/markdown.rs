//! Markdown to typed content blocks

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use serde::Serialize;

/// One display block of a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Heading, level 1 to 3
    Heading { level: u8, text: String },
    Paragraph(Vec<Inline>),
    /// Fenced or indented code, kept verbatim
    Code {
        language: Option<String>,
        code: String,
    },
    List { ordered: bool, items: Vec<Vec<Inline>> },
    Quote(Vec<Inline>),
    Rule,
}

/// Inline span inside a paragraph, list item or quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(String),
    Strong(String),
    Link { text: String, href: String },
    Image { alt: String, src: String },
}

impl Inline {
    /// Visible text of the span
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(s) | Inline::Code(s) | Inline::Emphasis(s) | Inline::Strong(s) => s,
            Inline::Link { text, .. } => text,
            Inline::Image { alt, .. } => alt,
        }
    }
}

/// Heading entry for a table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

/// Parse a markdown body into display blocks.
///
/// Blank lines produce nothing. HTML blocks are dropped; inline tags are kept
/// as text. Headings deeper than level 3 are clamped to 3. An unterminated
/// code fence runs to the end of the body. A code block inside a list item
/// splits the list around it.
pub fn parse_blocks(markdown: &str) -> Vec<ContentBlock> {
    // Front-matter is handled in FrontMatter::parse(); no metadata blocks here
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.handle(event);
    }
    builder.blocks
}

/// Headings of a parsed body, for in-page navigation
pub fn table_of_contents(blocks: &[ContentBlock]) -> Vec<TocEntry> {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Heading { level, text } if *level >= 2 => Some(TocEntry {
                level: *level,
                text: text.clone(),
                anchor: slug::slugify(text),
            }),
            _ => None,
        })
        .collect()
}

/// Concatenate the visible text of inline spans
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::text).collect()
}

#[derive(Debug)]
enum Frame {
    Heading(u8),
    Paragraph,
    CodeBlock,
    List,
    Item,
    Quote,
    Emphasis,
    Strong,
    Link(String),
    Image(String),
    Other,
}

#[derive(Debug)]
struct ListState {
    ordered: bool,
    items: Vec<Vec<Inline>>,
}

#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<ContentBlock>,
    stack: Vec<Frame>,
    inlines: Vec<Inline>,
    code: String,
    code_lang: Option<String>,
    label: String,
    lists: Vec<ListState>,
    quote_depth: usize,
}

impl BlockBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.in_label() {
                    self.label.push_str(&code);
                } else {
                    push_inline(&mut self.inlines, Inline::Code(code.to_string()));
                }
            }
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            Event::Rule => {
                if self.lists.is_empty() {
                    self.blocks.push(ContentBlock::Rule);
                }
            }
            // Tag-like prose such as `Vec<String>` or `a <test>.`
            Event::InlineHtml(html) => self.text(&html),
            Event::Html(html) if matches!(self.stack.last(), Some(Frame::Paragraph)) => {
                self.text(&html)
            }
            // HTML blocks, footnotes, task markers
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Heading { level, .. } => Frame::Heading(heading_level(level)),
            Tag::Paragraph => Frame::Paragraph,
            Tag::CodeBlock(kind) => {
                self.code.clear();
                self.code_lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };
                Frame::CodeBlock
            }
            Tag::List(start) => {
                // Text before a nested list belongs to the parent item
                if !self.lists.is_empty() {
                    self.flush_item();
                }
                self.lists.push(ListState {
                    ordered: start.is_some(),
                    items: Vec::new(),
                });
                Frame::List
            }
            Tag::Item => Frame::Item,
            Tag::BlockQuote(_) => {
                self.quote_depth += 1;
                Frame::Quote
            }
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Link { dest_url, .. } => {
                self.label.clear();
                Frame::Link(dest_url.to_string())
            }
            Tag::Image { dest_url, .. } => {
                self.label.clear();
                Frame::Image(dest_url.to_string())
            }
            _ => Frame::Other,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Heading(level) => {
                let text = plain_text(&std::mem::take(&mut self.inlines));
                self.blocks.push(ContentBlock::Heading {
                    level,
                    text: text.trim().to_string(),
                });
            }
            Frame::Paragraph => {
                if !self.lists.is_empty() {
                    // Loose list items: paragraphs stay with the item
                    push_inline(&mut self.inlines, Inline::Text(" ".to_string()));
                    return;
                }
                let inlines = trim_inlines(std::mem::take(&mut self.inlines));
                if inlines.is_empty() {
                    return;
                }
                if self.quote_depth > 0 {
                    self.blocks.push(ContentBlock::Quote(inlines));
                } else {
                    self.blocks.push(ContentBlock::Paragraph(inlines));
                }
            }
            Frame::CodeBlock => {
                let mut code = std::mem::take(&mut self.code);
                if code.ends_with('\n') {
                    code.pop();
                }
                if !self.lists.is_empty() {
                    self.split_list();
                }
                self.blocks.push(ContentBlock::Code {
                    language: self.code_lang.take(),
                    code,
                });
            }
            Frame::Item => self.flush_item(),
            Frame::List => {
                let Some(list) = self.lists.pop() else {
                    return;
                };
                match self.lists.last_mut() {
                    // Nested lists flatten into their parent
                    Some(parent) => parent.items.extend(list.items),
                    None => {
                        if !list.items.is_empty() {
                            self.blocks.push(ContentBlock::List {
                                ordered: list.ordered,
                                items: list.items,
                            });
                        }
                    }
                }
            }
            Frame::Quote => self.quote_depth = self.quote_depth.saturating_sub(1),
            Frame::Link(href) => {
                let text = std::mem::take(&mut self.label);
                if self.in_label() {
                    self.label.push_str(&text);
                } else {
                    push_inline(&mut self.inlines, Inline::Link { text, href });
                }
            }
            Frame::Image(src) => {
                let alt = std::mem::take(&mut self.label);
                if self.in_label() {
                    // Linked image: the alt text becomes the link text
                    self.label.push_str(&alt);
                } else {
                    push_inline(&mut self.inlines, Inline::Image { alt, src });
                }
            }
            Frame::Emphasis | Frame::Strong | Frame::Other => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block() {
            self.code.push_str(text);
        } else if self.in_label() {
            self.label.push_str(text);
        } else if self.stack.iter().any(|f| matches!(f, Frame::Strong)) {
            push_inline(&mut self.inlines, Inline::Strong(text.to_string()));
        } else if self.stack.iter().any(|f| matches!(f, Frame::Emphasis)) {
            push_inline(&mut self.inlines, Inline::Emphasis(text.to_string()));
        } else {
            push_inline(&mut self.inlines, Inline::Text(text.to_string()));
        }
    }

    fn flush_item(&mut self) {
        let inlines = trim_inlines(std::mem::take(&mut self.inlines));
        if inlines.is_empty() {
            return;
        }
        if let Some(list) = self.lists.last_mut() {
            list.items.push(inlines);
        }
    }

    /// Emit the items collected so far so a block inside an item keeps its
    /// place; the open lists continue after it
    fn split_list(&mut self) {
        self.flush_item();
        let ordered = self.lists.first().is_some_and(|l| l.ordered);
        let items: Vec<_> = self
            .lists
            .iter_mut()
            .flat_map(|list| std::mem::take(&mut list.items))
            .collect();
        if !items.is_empty() {
            self.blocks.push(ContentBlock::List { ordered, items });
        }
    }

    fn in_code_block(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::CodeBlock))
    }

    fn in_label(&self) -> bool {
        self.stack
            .iter()
            .any(|f| matches!(f, Frame::Link(_) | Frame::Image(_)))
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}

/// Append a span, merging it into the previous one when both are the same kind
fn push_inline(inlines: &mut Vec<Inline>, inline: Inline) {
    if let Some(last) = inlines.last_mut() {
        match (last, &inline) {
            (Inline::Text(prev), Inline::Text(next))
            | (Inline::Emphasis(prev), Inline::Emphasis(next))
            | (Inline::Strong(prev), Inline::Strong(next)) => {
                prev.push_str(next);
                return;
            }
            _ => {}
        }
    }
    inlines.push(inline);
}

/// Drop leading/trailing whitespace of a span sequence
fn trim_inlines(mut inlines: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(first)) = inlines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        *last = last.trim_end().to_string();
    }
    inlines.retain(|i| !matches!(i, Inline::Text(t) if t.is_empty()));
    inlines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_single_fenced_block() {
        let blocks = parse_blocks("```js\nconst a = 1;\nconsole.log(a);\n```\n");
        assert_eq!(
            blocks,
            vec![ContentBlock::Code {
                language: Some("js".to_string()),
                code: "const a = 1;\nconsole.log(a);".to_string(),
            }]
        );
    }

    #[test]
    fn test_heading_marker_stripped_once() {
        assert_eq!(
            parse_blocks("## Title"),
            vec![ContentBlock::Heading {
                level: 2,
                text: "Title".to_string()
            }]
        );
        assert_eq!(
            parse_blocks("# One\n### Three"),
            vec![
                ContentBlock::Heading {
                    level: 1,
                    text: "One".to_string()
                },
                ContentBlock::Heading {
                    level: 3,
                    text: "Three".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_deep_headings_clamp_to_three() {
        assert_eq!(
            parse_blocks("##### Deep"),
            vec![ContentBlock::Heading {
                level: 3,
                text: "Deep".to_string()
            }]
        );
    }

    #[test]
    fn test_inline_code_spans() {
        let blocks = parse_blocks("Run `cargo test` before `git push` please");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph(vec![
                text("Run "),
                Inline::Code("cargo test".to_string()),
                text(" before "),
                Inline::Code("git push".to_string()),
                text(" please"),
            ])]
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        let blocks = parse_blocks("first\n\n\n\nsecond\n");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph(vec![text("first")]),
                ContentBlock::Paragraph(vec![text("second")]),
            ]
        );
        assert!(parse_blocks("\n\n   \n").is_empty());
    }

    #[test]
    fn test_unterminated_fence_keeps_lines() {
        let blocks = parse_blocks("intro\n\n```rust\nfn main() {}\nlet x = 1;");
        assert_eq!(blocks.len(), 2);
        match &blocks[1] {
            ContentBlock::Code { language, code } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert!(code.contains("let x = 1;"));
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_code_block_content_is_verbatim() {
        let blocks = parse_blocks("```\n# not a heading\n<b>&</b>\n```");
        assert_eq!(
            blocks,
            vec![ContentBlock::Code {
                language: None,
                code: "# not a heading\n<b>&</b>".to_string(),
            }]
        );
    }

    #[test]
    fn test_emphasis_links_and_images() {
        let blocks = parse_blocks("Some *soft* and **loud** [docs](https://docs.rs) ![logo](/logo.png)");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph(vec![
                text("Some "),
                Inline::Emphasis("soft".to_string()),
                text(" and "),
                Inline::Strong("loud".to_string()),
                text(" "),
                Inline::Link {
                    text: "docs".to_string(),
                    href: "https://docs.rs".to_string()
                },
                text(" "),
                Inline::Image {
                    alt: "logo".to_string(),
                    src: "/logo.png".to_string()
                },
            ])]
        );
    }

    #[test]
    fn test_lists_and_nesting() {
        let blocks = parse_blocks("- one\n- two\n  - nested\n\n1. first\n2. second\n");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::List {
                    ordered: false,
                    items: vec![vec![text("one")], vec![text("two")], vec![text("nested")]],
                },
                ContentBlock::List {
                    ordered: true,
                    items: vec![vec![text("first")], vec![text("second")]],
                },
            ]
        );
    }

    #[test]
    fn test_quote_and_rule() {
        let blocks = parse_blocks("> quoted words\n\n---\n\nafter");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Quote(vec![text("quoted words")]),
                ContentBlock::Rule,
                ContentBlock::Paragraph(vec![text("after")]),
            ]
        );
    }

    #[test]
    fn test_raw_html_dropped() {
        let blocks = parse_blocks("<div>\nhidden\n</div>\n\nvisible");
        assert_eq!(blocks, vec![ContentBlock::Paragraph(vec![text("visible")])]);
    }

    #[test]
    fn test_angle_brackets_in_prose_kept() {
        let blocks = parse_blocks("This is a <test>. Use Vec<String> here.");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph(vec![text(
                "This is a <test>. Use Vec<String> here."
            )])]
        );
    }

    #[test]
    fn test_code_block_inside_list_keeps_order() {
        let blocks = parse_blocks("- step one\n\n  ```sh\n  ls\n  ```\n- step two");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::List {
                    ordered: false,
                    items: vec![vec![text("step one")]],
                },
                ContentBlock::Code {
                    language: Some("sh".to_string()),
                    code: "ls".to_string(),
                },
                ContentBlock::List {
                    ordered: false,
                    items: vec![vec![text("step two")]],
                },
            ]
        );
    }

    #[test]
    fn test_linked_image_uses_alt_as_link_text() {
        let blocks = parse_blocks("[![badge](/b.svg)](https://ci.example)");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph(vec![Inline::Link {
                text: "badge".to_string(),
                href: "https://ci.example".to_string()
            }])]
        );
    }

    #[test]
    fn test_table_of_contents() {
        let blocks = parse_blocks("# Top\n## Getting Started\ntext\n### Install It");
        let toc = table_of_contents(&blocks);
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].anchor, "getting-started");
        assert_eq!(toc[1].level, 3);
    }
}
