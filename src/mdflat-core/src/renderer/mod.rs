//! Flattening renderer: walks a token tree into display lines plus
//! byte-addressed attribute spans.
//!
//! # Architecture
//!
//! A [`Flattener`] owns one line buffer and one attribute collection for
//! the duration of a single pass. Every token kind renders against the
//! current end of that buffer; nested block constructs (blockquote bodies,
//! list items) render through a *fresh* nested instance whose finished
//! lines and attributes are shifted by a position delta and merged into the
//! parent. The delta-shift merge is what lets each kind render in
//! isolation, oblivious to its ancestors, while the final output stays in
//! one consistent coordinate space.
//!
//! All column arithmetic is in UTF-8 bytes; the first line and column of
//! the output are both 1.

mod handlers;


use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::attr::TextAttrItem;
use crate::entities;
use crate::error::RenderError;
use crate::position::{Pos, Range};
use crate::token::Token;

/// Rendered output: one string per display line, plus the attribute spans
/// addressing byte ranges within those lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub text: Vec<String>,
    pub attrs: Vec<TextAttrItem>,
}

/// Render a token tree into flattened text plus attribute spans.
///
/// All-or-nothing: on error no output escapes, so every emitted attribute
/// keeps addressing text that exists. Trailing blank (empty or
/// whitespace-only) lines are trimmed from the end of the final output.
pub fn render(tokens: &[Token]) -> Result<RenderOutput, RenderError> {
    let mut flattener = Flattener::default();
    flattener.render_list(tokens)?;
    let mut output = flattener.into_output();
    trim_trailing_blank_lines(&mut output.text);
    trace!(
        lines = output.text.len(),
        attrs = output.attrs.len(),
        "flattened token tree"
    );
    Ok(output)
}

/// One render pass.
///
/// Created per top-level call and per recursive descent into blockquote or
/// list-item content; never reused across passes.
#[derive(Debug, Default)]
pub(crate) struct Flattener {
    text: Vec<String>,
    attrs: Vec<TextAttrItem>,
}

impl Flattener {
    /// The position immediately after the last byte of the buffer:
    /// `{ line: line count, character: byte length of the last line + 1 }`.
    /// `exclusive` yields one byte column further, for callers that need an
    /// exclusive-end position outright.
    fn end_of_buffer(&self, exclusive: bool) -> Pos {
        let character = self.text.last().map_or(0, String::len) + 1;
        Pos::new(
            self.text.len(),
            if exclusive { character + 1 } else { character },
        )
    }

    /// The position the next appended byte would land on.
    fn append_point(&self) -> Pos {
        if self.text.is_empty() {
            Pos::new(1, 1)
        } else {
            self.end_of_buffer(false)
        }
    }

    /// Append raw text: entities are unescaped, the first newline-separated
    /// segment is concatenated onto the current last line (or becomes line
    /// 1 of an empty buffer), remaining segments are pushed as new lines.
    /// Returns the range covering exactly the appended text.
    fn append_text(&mut self, raw: &str) -> Range {
        let unescaped = entities::unescape(raw);
        let start = self.append_point();
        let mut segments = unescaped.split('\n');
        if let Some(first) = segments.next() {
            match self.text.last_mut() {
                Some(last) => last.push_str(first),
                None => self.text.push(first.to_owned()),
            }
        }
        for segment in segments {
            self.text.push(segment.to_owned());
        }
        Range::new(start, self.end_of_buffer(false))
    }

    /// Append an empty line. Subsequent appends land on it.
    fn push_blank_line(&mut self) {
        self.text.push(String::new());
    }

    /// Render every token in order; returns the covering range.
    fn render_list(&mut self, tokens: &[Token]) -> Result<Range, RenderError> {
        let start = self.append_point();
        for token in tokens {
            self.render_token(token)?;
        }
        Ok(Range::new(start, self.end_of_buffer(false)))
    }

    /// Merge a finished nested render into this buffer.
    ///
    /// Lines are appended as new lines; every attribute shifts down by the
    /// current line count and right by `characters` bytes (the per-line
    /// prefix width the caller just applied).
    fn merge(&mut self, lines: Vec<String>, attrs: Vec<TextAttrItem>, characters: usize) {
        let line_delta = self.text.len();
        self.text.extend(lines);
        self.attrs.extend(attrs.into_iter().map(|mut attr| {
            attr.shift(line_delta, characters);
            attr
        }));
    }

    fn into_output(self) -> RenderOutput {
        RenderOutput {
            text: self.text,
            attrs: self.attrs,
        }
    }
}

/// Drop blank (empty or whitespace-only) lines from the end.
pub(crate) fn trim_trailing_blank_lines(lines: &mut Vec<String>) {
    while lines
        .last()
        .is_some_and(|line| line.trim().is_empty())
    {
        lines.pop();
    }
}
