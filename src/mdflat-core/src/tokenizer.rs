//! Markdown tokenizer: adapts pulldown-cmark's event stream to the token
//! tree the renderer consumes.
//!
//! pulldown-cmark produces a flat stream of start/end events; the renderer
//! dispatches over a tree of typed tokens. This module rebuilds the tree,
//! parsing with the extended ("GitHub-flavored") rule set: tables,
//! strikethrough, task lists.
//!
//! The adapter walks the offset iterator rather than the plain parser for
//! two reasons:
//! - Tables pass through as raw source slices (the renderer never lays
//!   them out), so the original text must be recoverable.
//! - Blank lines between sibling blocks become `space` tokens. The
//!   renderer's line accounting depends on them: a paragraph parks the
//!   cursor on its own trailing blank line, and the `space` token is what
//!   moves the next block off it.

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, OffsetIter, Options, Parser, Tag, TagEnd,
};

use crate::token::{ListItem, Token};

/// Parser options for the extended ("GitHub-flavored") rule set.
fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Tokenize markdown source into the tree the renderer consumes.
pub fn tokenize(source: &str) -> Vec<Token> {
    let parser = Parser::new_ext(source, options());
    let mut builder = TreeBuilder {
        source,
        iter: parser.into_offset_iter(),
        task_stack: Vec::new(),
    };
    builder.collect(None)
}

struct TreeBuilder<'a> {
    source: &'a str,
    iter: OffsetIter<'a>,
    /// One slot per item currently being collected; a task-list marker
    /// fills the innermost slot, so nested task items cannot clobber an
    /// ancestor's checkbox.
    task_stack: Vec<Option<bool>>,
}

impl<'a> TreeBuilder<'a> {
    /// Collect tokens until the end tag matching `until` (or end of
    /// stream). Handles both block and inline scopes; blank inter-block
    /// gaps become `space` tokens.
    fn collect(&mut self, until: Option<TagEnd>) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut prev_block_end: Option<usize> = None;
        while let Some((event, range)) = self.iter.next() {
            match event {
                Event::End(end) => {
                    if until.as_ref().is_some_and(|u| ends(&end, u)) {
                        break;
                    }
                }
                Event::Start(tag) => {
                    if is_block_tag(&tag) {
                        self.push_gap(&mut tokens, prev_block_end, range.start);
                        prev_block_end = Some(range.end);
                    }
                    if let Some(token) = self.build_tag(tag, range) {
                        tokens.push(token);
                    }
                }
                Event::Rule => {
                    self.push_gap(&mut tokens, prev_block_end, range.start);
                    prev_block_end = Some(range.end);
                    tokens.push(Token::Hr);
                }
                Event::Text(text) => tokens.push(Token::Text {
                    text: text.to_string(),
                }),
                Event::Code(code) => tokens.push(Token::Codespan {
                    text: code.to_string(),
                }),
                Event::SoftBreak => tokens.push(Token::Text {
                    text: "\n".to_string(),
                }),
                Event::HardBreak => tokens.push(Token::Br),
                Event::Html(html) | Event::InlineHtml(html) => tokens.push(Token::Html {
                    raw: html.to_string(),
                }),
                Event::TaskListMarker(checked) => {
                    if let Some(slot) = self.task_stack.last_mut() {
                        *slot = Some(checked);
                    }
                }
                // Footnotes and math are not enabled.
                _ => {}
            }
        }
        tokens
    }

    /// Build the token for a start tag, consuming through its end tag.
    fn build_tag(&mut self, tag: Tag<'a>, range: std::ops::Range<usize>) -> Option<Token> {
        match tag {
            Tag::Paragraph => Some(Token::Paragraph {
                tokens: self.collect(Some(TagEnd::Paragraph)),
            }),
            Tag::Heading { level, .. } => Some(Token::Heading {
                depth: heading_depth(level),
                tokens: self.collect(Some(TagEnd::Heading(level))),
            }),
            Tag::CodeBlock(kind) => Some(self.build_code_block(kind)),
            Tag::BlockQuote(_) => Some(Token::Blockquote {
                tokens: self.collect(Some(TagEnd::BlockQuote(None))),
            }),
            Tag::List(start) => Some(self.build_list(start.is_some())),
            Tag::Emphasis => Some(Token::Em {
                tokens: self.collect(Some(TagEnd::Emphasis)),
            }),
            Tag::Strong => Some(Token::Strong {
                tokens: self.collect(Some(TagEnd::Strong)),
            }),
            Tag::Strikethrough => Some(Token::Del {
                tokens: self.collect(Some(TagEnd::Strikethrough)),
            }),
            Tag::Link {
                dest_url, title, ..
            } => {
                let tokens = self.collect(Some(TagEnd::Link));
                let text = plain_text(&tokens);
                Some(Token::Link {
                    href: dest_url.to_string(),
                    title: (!title.is_empty()).then(|| title.to_string()),
                    text,
                    tokens,
                })
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let alt = self.collect(Some(TagEnd::Image));
                Some(Token::Image {
                    href: dest_url.to_string(),
                    title: (!title.is_empty()).then(|| title.to_string()),
                    text: plain_text(&alt),
                })
            }
            Tag::Table(_) => Some(self.build_table(range)),
            Tag::HtmlBlock => Some(self.build_html_block()),
            // Items are consumed by `build_list`; table internals by
            // `build_table`. Anything newer is not enabled.
            _ => None,
        }
    }

    fn build_code_block(&mut self, kind: CodeBlockKind<'_>) -> Token {
        let lang = match kind {
            CodeBlockKind::Fenced(info) => info.trim().to_string(),
            CodeBlockKind::Indented => String::new(),
        };
        let mut text = String::new();
        while let Some((event, _)) = self.iter.next() {
            match event {
                Event::Text(chunk) => text.push_str(&chunk),
                Event::End(TagEnd::CodeBlock) => break,
                _ => {}
            }
        }
        if text.ends_with('\n') {
            text.pop();
        }
        Token::Code { lang, text }
    }

    fn build_list(&mut self, ordered: bool) -> Token {
        let mut items = Vec::new();
        while let Some((event, _)) = self.iter.next() {
            match event {
                Event::Start(Tag::Item) => {
                    self.task_stack.push(None);
                    let tokens = self.collect(Some(TagEnd::Item));
                    let checked = self.task_stack.pop().flatten();
                    items.push(ListItem { tokens, checked });
                }
                Event::End(TagEnd::List(_)) => break,
                _ => {}
            }
        }
        Token::List { ordered, items }
    }

    fn build_table(&mut self, range: std::ops::Range<usize>) -> Token {
        let raw = self.source[range].trim_end_matches('\n').to_string();
        while let Some((event, _)) = self.iter.next() {
            if matches!(event, Event::End(TagEnd::Table)) {
                break;
            }
        }
        Token::Table { raw }
    }

    fn build_html_block(&mut self) -> Token {
        let mut raw = String::new();
        while let Some((event, _)) = self.iter.next() {
            match event {
                Event::Html(html) | Event::Text(html) => raw.push_str(&html),
                Event::End(TagEnd::HtmlBlock) => break,
                _ => {}
            }
        }
        Token::Html { raw }
    }

    /// Insert a `space` token when the gap before the block starting at
    /// `start` spans at least one blank line.
    ///
    /// The payload is rebuilt from the newline count rather than sliced, so
    /// container markers sitting in the gap (`>` between quoted paragraphs)
    /// cannot leak into it. The previous block's own line ending counts
    /// toward the total, matching the raw run of newlines a tokenizer
    /// working on the flat source would emit.
    fn push_gap(&self, tokens: &mut Vec<Token>, prev_end: Option<usize>, start: usize) {
        let Some(end) = prev_end else { return };
        if start < end {
            return;
        }
        let mut newlines = self.source[end..start].matches('\n').count();
        if self.source[..end].ends_with('\n') {
            newlines += 1;
        }
        if newlines >= 2 {
            tokens.push(Token::Space {
                raw: "\n".repeat(newlines),
            });
        }
    }
}

/// Whether two end tags close the same construct (payloads ignored).
fn ends(end: &TagEnd, until: &TagEnd) -> bool {
    std::mem::discriminant(end) == std::mem::discriminant(until)
}

fn is_block_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::CodeBlock(_)
            | Tag::BlockQuote(_)
            | Tag::List(_)
            | Tag::Table(_)
            | Tag::HtmlBlock
    )
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Concatenated plain text of a token list (link fallback label, image
/// alt text).
fn plain_text(tokens: &[Token]) -> String {
    fn walk(tokens: &[Token], out: &mut String) {
        for token in tokens {
            match token {
                Token::Text { text } | Token::Codespan { text } => out.push_str(text),
                Token::Strong { tokens }
                | Token::Em { tokens }
                | Token::Del { tokens }
                | Token::Link { tokens, .. } => walk(tokens, out),
                Token::Image { text, .. } => out.push_str(text),
                _ => {}
            }
        }
    }

    let mut out = String::new();
    walk(tokens, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::tokenize;
    use crate::token::Token;

    #[test]
    fn paragraphs_separated_by_blank_lines_yield_space_tokens() {
        let tokens = tokenize("first\n\nsecond");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], Token::Paragraph { .. }));
        assert_eq!(
            tokens[1],
            Token::Space {
                raw: "\n\n".to_string()
            }
        );
        assert!(matches!(tokens[2], Token::Paragraph { .. }));
    }

    #[test]
    fn flush_blocks_yield_no_space_token() {
        let tokens = tokenize("# title\nbody");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0], Token::Heading { depth: 1, .. }));
        assert!(matches!(tokens[1], Token::Paragraph { .. }));
    }

    #[test]
    fn extra_blank_lines_widen_the_space_token() {
        let tokens = tokenize("a\n\n\nb");
        assert_eq!(
            tokens[1],
            Token::Space {
                raw: "\n\n\n".to_string()
            }
        );
    }

    #[test]
    fn fenced_code_keeps_info_string_and_drops_trailing_newline() {
        let tokens = tokenize("```rust\nfn main() {}\n```");
        assert_eq!(
            tokens,
            vec![Token::Code {
                lang: "rust".to_string(),
                text: "fn main() {}".to_string(),
            }]
        );
    }

    #[test]
    fn task_items_carry_checkbox_state() {
        let tokens = tokenize("- [x] done\n- [ ] todo\n- plain");
        let Token::List { ordered, items } = &tokens[0] else {
            panic!("expected list, got {tokens:?}");
        };
        assert!(!*ordered);
        assert_eq!(
            items.iter().map(|i| i.checked).collect::<Vec<_>>(),
            vec![Some(true), Some(false), None]
        );
    }

    #[test]
    fn ordered_list_detected() {
        let tokens = tokenize("1. one\n2. two");
        let Token::List { ordered, items } = &tokens[0] else {
            panic!("expected list, got {tokens:?}");
        };
        assert!(*ordered);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn nested_task_items_keep_their_own_checkbox() {
        let tokens = tokenize("- [x] outer\n  - [ ] inner");
        let Token::List { items, .. } = &tokens[0] else {
            panic!("expected list, got {tokens:?}");
        };
        assert_eq!(items[0].checked, Some(true));
        let Some(Token::List { items: inner, .. }) = items[0]
            .tokens
            .iter()
            .find(|t| matches!(t, Token::List { .. }))
        else {
            panic!("expected nested list in {:?}", items[0].tokens);
        };
        assert_eq!(inner[0].checked, Some(false));
    }

    #[test]
    fn tables_arrive_as_raw_source() {
        let source = "| a | b |\n|---|---|\n| 1 | 2 |";
        let tokens = tokenize(source);
        assert_eq!(
            tokens,
            vec![Token::Table {
                raw: source.to_string()
            }]
        );
    }

    #[test]
    fn inline_html_becomes_html_token() {
        let tokens = tokenize("before <b>bold</b> after");
        let Token::Paragraph { tokens: inline } = &tokens[0] else {
            panic!("expected paragraph, got {tokens:?}");
        };
        assert!(
            inline
                .iter()
                .any(|t| matches!(t, Token::Html { raw } if raw == "<b>"))
        );
    }

    #[test]
    fn quoted_paragraph_gaps_never_leak_quote_markers() {
        let tokens = tokenize("> a\n>\n> b");
        let Token::Blockquote { tokens: inner } = &tokens[0] else {
            panic!("expected blockquote, got {tokens:?}");
        };
        assert_eq!(inner.len(), 3);
        assert_eq!(
            inner[1],
            Token::Space {
                raw: "\n\n".to_string()
            }
        );
    }

    #[test]
    fn soft_breaks_become_newline_text() {
        let tokens = tokenize("a\nb");
        let Token::Paragraph { tokens: inline } = &tokens[0] else {
            panic!("expected paragraph, got {tokens:?}");
        };
        assert_eq!(
            inline,
            &vec![
                Token::Text {
                    text: "a".to_string()
                },
                Token::Text {
                    text: "\n".to_string()
                },
                Token::Text {
                    text: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn link_carries_href_title_and_children() {
        let tokens = tokenize("[label](https://example.com \"hi\")");
        let Token::Paragraph { tokens: inline } = &tokens[0] else {
            panic!("expected paragraph, got {tokens:?}");
        };
        let Token::Link {
            href,
            title,
            text,
            tokens: children,
        } = &inline[0]
        else {
            panic!("expected link, got {inline:?}");
        };
        assert_eq!(href, "https://example.com");
        assert_eq!(title.as_deref(), Some("hi"));
        assert_eq!(text, "label");
        assert_eq!(children.len(), 1);
    }
}
