//! Per-kind rendering rules for the flattener.

use std::borrow::Cow;

use crate::attr::TextAttrItem;
use crate::error::RenderError;
use crate::token::{ListItem, Token};

use super::{Flattener, trim_trailing_blank_lines};

/// Display equivalent of an unordered list marker.
const BULLET: &str = "•";

/// Byte width of a rendered checkbox column (`" [x]"` / `" [ ]"`).
const CHECKBOX_WIDTH: usize = 4;

/// Per-line blockquote prefix.
const QUOTE_PREFIX: &str = "> ";

impl Flattener {
    /// Dispatch one token. The match is exhaustive over the closed kind
    /// set; an unhandled kind cannot compile.
    pub(super) fn render_token(&mut self, token: &Token) -> Result<(), RenderError> {
        match token {
            Token::Paragraph { tokens } => self.render_paragraph(tokens),
            Token::Heading { depth, tokens } => self.render_heading(*depth, tokens),
            Token::Text { text } => {
                self.append_text(text);
                Ok(())
            }
            Token::Space { raw } => {
                self.render_space(raw);
                Ok(())
            }
            Token::Br => {
                self.push_blank_line();
                Ok(())
            }
            Token::Strong { tokens } => {
                let range = self.render_list(tokens)?;
                self.attrs.push(TextAttrItem::Bold { range });
                Ok(())
            }
            Token::Del { tokens } => {
                let range = self.render_list(tokens)?;
                self.attrs.push(TextAttrItem::Strike { range });
                Ok(())
            }
            Token::Em { tokens } => {
                let range = self.render_list(tokens)?;
                self.attrs.push(TextAttrItem::Italic { range });
                Ok(())
            }
            Token::Link {
                href,
                title,
                text,
                tokens,
            } => self.render_link(href, title.as_deref(), text, tokens),
            Token::Image { href, title, text } => {
                self.render_image(href, title.as_deref(), text);
                Ok(())
            }
            Token::Code { lang, text } => {
                self.render_code(lang, text);
                Ok(())
            }
            Token::Codespan { text } => {
                self.render_codespan(text);
                Ok(())
            }
            Token::Blockquote { tokens } => self.render_blockquote(tokens),
            Token::Hr => {
                self.render_hr();
                Ok(())
            }
            Token::List { ordered, items } => self.render_list_token(*ordered, items),
            Token::Table { raw } => {
                self.append_text(raw);
                Ok(())
            }
            Token::Html { raw } => Err(RenderError::Unsupported {
                kind: "html",
                raw: raw.clone(),
            }),
            Token::Def { raw } => Err(RenderError::Unsupported {
                kind: "def",
                raw: raw.clone(),
            }),
            Token::Escape { raw } => Err(RenderError::Unsupported {
                kind: "escape",
                raw: raw.clone(),
            }),
        }
    }

    fn render_paragraph(&mut self, tokens: &[Token]) -> Result<(), RenderError> {
        self.render_list(tokens)?;
        self.push_blank_line();
        Ok(())
    }

    /// The `#` marker stays in the text; the `title` span covers only the
    /// rendered children after it.
    fn render_heading(&mut self, depth: usize, tokens: &[Token]) -> Result<(), RenderError> {
        self.append_text(&format!("{} ", "#".repeat(depth)));
        let range = self.render_list(tokens)?;
        self.push_blank_line();
        self.attrs.push(TextAttrItem::Title { depth, range });
        Ok(())
    }

    /// Blank-line run between blocks: one trailing newline is the previous
    /// block's own line ending, the rest advance the buffer.
    fn render_space(&mut self, raw: &str) {
        let trimmed = raw.strip_suffix('\n').unwrap_or(raw);
        self.append_text(trimmed);
    }

    fn render_link(
        &mut self,
        href: &str,
        title: Option<&str>,
        text: &str,
        tokens: &[Token],
    ) -> Result<(), RenderError> {
        self.append_text("[");
        let label = if tokens.is_empty() {
            self.append_text(text)
        } else {
            self.render_list(tokens)?
        };
        self.attrs.push(TextAttrItem::Link { range: label });
        self.append_text("](");
        let url = self.append_text(href);
        self.attrs.push(TextAttrItem::Url { range: url });
        if let Some(title) = title {
            self.append_text(" ");
            let range = self.append_text(title);
            self.attrs.push(TextAttrItem::Title { depth: 0, range });
        }
        self.append_text(")");
        Ok(())
    }

    /// Like a link, but opened with `![` and the alt text always appended
    /// as plain text; image children are never rendered.
    fn render_image(&mut self, href: &str, title: Option<&str>, text: &str) {
        self.append_text("![");
        let alt = self.append_text(text);
        self.attrs.push(TextAttrItem::Link { range: alt });
        self.append_text("](");
        let url = self.append_text(href);
        self.attrs.push(TextAttrItem::Url { range: url });
        if let Some(title) = title {
            self.append_text(" ");
            let range = self.append_text(title);
            self.attrs.push(TextAttrItem::Title { depth: 0, range });
        }
        self.append_text(")");
    }

    /// Code body only; fence delimiters never reach the output. The
    /// trailing blank line forces separation from following content.
    fn render_code(&mut self, lang: &str, text: &str) {
        let range = self.append_text(text);
        self.attrs.push(TextAttrItem::Fenced {
            lang: lang.to_owned(),
            range,
        });
        self.push_blank_line();
    }

    fn render_codespan(&mut self, text: &str) {
        let open = self.append_text("`");
        self.attrs
            .push(TextAttrItem::CodespanDelimiter { range: open });
        let body = self.append_text(text);
        self.attrs.push(TextAttrItem::Codespan { range: body });
        let close = self.append_text("`");
        self.attrs
            .push(TextAttrItem::CodespanDelimiter { range: close });
    }

    fn render_blockquote(&mut self, tokens: &[Token]) -> Result<(), RenderError> {
        let mut nested = Flattener::default();
        nested.render_list(tokens)?;
        let mut output = nested.into_output();
        trim_trailing_blank_lines(&mut output.text);
        let lines: Vec<String> = output
            .text
            .into_iter()
            .map(|line| format!("{QUOTE_PREFIX}{line}"))
            .collect();
        self.merge(lines, output.attrs, QUOTE_PREFIX.len());
        self.push_blank_line();
        Ok(())
    }

    /// The rule is zero-width: it owns a blank output line and the display
    /// layer draws it there.
    fn render_hr(&mut self) {
        self.push_blank_line();
        self.attrs.push(TextAttrItem::HorizontalRule {
            line: self.text.len(),
        });
    }

    fn render_list_token(&mut self, ordered: bool, items: &[ListItem]) -> Result<(), RenderError> {
        let label_width = if ordered {
            digit_width(items.len()) + 1
        } else {
            BULLET.len()
        };
        let checkbox_width = if items.iter().any(|item| item.checked.is_some()) {
            CHECKBOX_WIDTH
        } else {
            0
        };
        let indent_width = label_width + checkbox_width + 1;

        for (index, item) in items.iter().enumerate() {
            let mut nested = Flattener::default();
            nested.render_item(item)?;
            let output = nested.into_output();

            let label = if ordered {
                format!("{:>width$}.", index + 1, width = label_width - 1)
            } else {
                BULLET.to_owned()
            };
            let checkbox = match item.checked {
                Some(true) => " [x]".to_owned(),
                Some(false) => " [ ]".to_owned(),
                None => " ".repeat(checkbox_width),
            };

            let mut lines = output.text.into_iter();
            let head = lines.next().unwrap_or_default();
            let mut prefixed = vec![format!("{label}{checkbox} {head}")];
            let indent = " ".repeat(indent_width);
            prefixed.extend(lines.map(|line| format!("{indent}{line}")));

            self.merge(prefixed, output.attrs, indent_width);
        }
        Ok(())
    }

    /// Item children render directly into the item's buffer, except nested
    /// lists (own sub-render, merged at the current end of buffer) and text
    /// children, whose interior-line indentation is dropped; the owning
    /// list re-indents continuation lines itself.
    fn render_item(&mut self, item: &ListItem) -> Result<(), RenderError> {
        for token in &item.tokens {
            match token {
                Token::List { ordered, items } => {
                    let mut nested = Flattener::default();
                    nested.render_list_token(*ordered, items)?;
                    let output = nested.into_output();
                    self.merge(output.text, output.attrs, 0);
                }
                Token::Text { text } => {
                    self.append_text(&strip_interior_indent(text));
                }
                other => self.render_token(other)?,
            }
        }
        Ok(())
    }
}

fn digit_width(count: usize) -> usize {
    count.max(1).to_string().len()
}

/// Drop whitespace immediately following each newline.
fn strip_interior_indent(text: &str) -> Cow<'_, str> {
    if !text.contains('\n') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for (index, segment) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            out.push_str(segment.trim_start());
        } else {
            out.push_str(segment);
        }
    }
    Cow::Owned(out)
}
