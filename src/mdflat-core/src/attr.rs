//! Attribute spans anchored to the flattened text.
//!
//! Every structural or stylistic feature the renderer preserves is reported
//! as a [`TextAttrItem`] addressing the flattened output by 1-indexed line
//! and byte column. The kind set is closed: each wire name in
//! [`KIND_NAMES`] maps to exactly one variant shape, and the dispatch over
//! variants is exhaustive, so adding a kind without updating every site is
//! a compile error.

use serde::{Deserialize, Serialize};

use crate::position::Range;

/// Wire names of every attribute kind, in declaration order.
///
/// The variant tag set of [`TextAttrItem`] must equal this set exactly:
/// no duplicates, no unlisted variants. Checked by tests independently of
/// any specific document.
pub const KIND_NAMES: [&str; 10] = [
    "fenced",
    "title",
    "horizontalrule",
    "bold",
    "strike",
    "italic",
    "link",
    "url",
    "codespan",
    "codespanDelimiter",
];

/// One annotation over the flattened text.
///
/// `Title` doubles as the link/image title annotation with `depth` 0; the
/// overload is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TextAttrItem {
    /// Fenced (or indented) code block body; `lang` is the fence info
    /// string, empty when absent.
    #[serde(rename = "fenced")]
    Fenced { lang: String, range: Range },
    /// Heading content (`depth` 1-6), or a link/image title (`depth` 0).
    #[serde(rename = "title")]
    Title { depth: usize, range: Range },
    /// Zero-width marker: the rule occupies a blank output line and has no
    /// byte range of its own.
    #[serde(rename = "horizontalrule")]
    HorizontalRule { line: usize },
    #[serde(rename = "bold")]
    Bold { range: Range },
    #[serde(rename = "strike")]
    Strike { range: Range },
    #[serde(rename = "italic")]
    Italic { range: Range },
    /// The rendered link label (or image alt text).
    #[serde(rename = "link")]
    Link { range: Range },
    /// The rendered link/image destination.
    #[serde(rename = "url")]
    Url { range: Range },
    #[serde(rename = "codespan")]
    Codespan { range: Range },
    /// One backtick delimiting a code span.
    #[serde(rename = "codespanDelimiter")]
    CodespanDelimiter { range: Range },
}

impl TextAttrItem {
    /// The wire name of this attribute's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TextAttrItem::Fenced { .. } => "fenced",
            TextAttrItem::Title { .. } => "title",
            TextAttrItem::HorizontalRule { .. } => "horizontalrule",
            TextAttrItem::Bold { .. } => "bold",
            TextAttrItem::Strike { .. } => "strike",
            TextAttrItem::Italic { .. } => "italic",
            TextAttrItem::Link { .. } => "link",
            TextAttrItem::Url { .. } => "url",
            TextAttrItem::Codespan { .. } => "codespan",
            TextAttrItem::CodespanDelimiter { .. } => "codespanDelimiter",
        }
    }

    /// Shift every position in this attribute by a merge delta.
    ///
    /// Line-only attributes move by lines alone; ranged attributes move
    /// both endpoints in both coordinates.
    pub(crate) fn shift(&mut self, lines: usize, characters: usize) {
        match self {
            TextAttrItem::HorizontalRule { line } => *line += lines,
            TextAttrItem::Fenced { range, .. }
            | TextAttrItem::Title { range, .. }
            | TextAttrItem::Bold { range }
            | TextAttrItem::Strike { range }
            | TextAttrItem::Italic { range }
            | TextAttrItem::Link { range }
            | TextAttrItem::Url { range }
            | TextAttrItem::Codespan { range }
            | TextAttrItem::CodespanDelimiter { range } => {
                *range = range.shifted(lines, characters);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::position::{Pos, Range};

    fn sample_range() -> Range {
        Range::new(Pos::new(1, 1), Pos::new(1, 2))
    }

    /// One value of every variant; breaks at compile time if a variant is
    /// added without extending it, via the exhaustive `kind_name` match.
    fn one_of_each() -> Vec<TextAttrItem> {
        vec![
            TextAttrItem::Fenced {
                lang: String::new(),
                range: sample_range(),
            },
            TextAttrItem::Title {
                depth: 1,
                range: sample_range(),
            },
            TextAttrItem::HorizontalRule { line: 1 },
            TextAttrItem::Bold {
                range: sample_range(),
            },
            TextAttrItem::Strike {
                range: sample_range(),
            },
            TextAttrItem::Italic {
                range: sample_range(),
            },
            TextAttrItem::Link {
                range: sample_range(),
            },
            TextAttrItem::Url {
                range: sample_range(),
            },
            TextAttrItem::Codespan {
                range: sample_range(),
            },
            TextAttrItem::CodespanDelimiter {
                range: sample_range(),
            },
        ]
    }

    #[test]
    fn declared_kind_names_are_unique() {
        let unique: HashSet<&str> = KIND_NAMES.iter().copied().collect();
        assert_eq!(unique.len(), KIND_NAMES.len());
    }

    #[test]
    fn variant_tags_cover_declared_names_exactly() {
        let variants = one_of_each();
        assert_eq!(variants.len(), KIND_NAMES.len());

        let tags: HashSet<&str> = variants.iter().map(|attr| attr.kind_name()).collect();
        let declared: HashSet<&str> = KIND_NAMES.iter().copied().collect();
        assert_eq!(tags, declared);
    }

    #[test]
    fn serializes_with_wire_kind_names() {
        for attr in one_of_each() {
            let json = serde_json::to_value(&attr).unwrap();
            assert_eq!(json["kind"], attr.kind_name());
        }
    }

    #[test]
    fn shift_moves_rule_lines_and_span_endpoints() {
        let mut rule = TextAttrItem::HorizontalRule { line: 2 };
        rule.shift(3, 9);
        assert_eq!(rule, TextAttrItem::HorizontalRule { line: 5 });

        let mut bold = TextAttrItem::Bold {
            range: sample_range(),
        };
        bold.shift(1, 2);
        assert_eq!(
            bold,
            TextAttrItem::Bold {
                range: Range::new(Pos::new(2, 3), Pos::new(2, 4)),
            }
        );
    }
}
