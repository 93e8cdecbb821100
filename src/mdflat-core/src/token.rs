//! The markdown token tree consumed by the flattening renderer.
//!
//! The kind set is closed and mirrors the tokenizer contract exactly:
//! the renderer dispatches over every variant with no fallback arm, so an
//! unhandled kind is a compile error rather than a runtime surprise.
//! `Html`, `Def`, and `Escape` are declared (a conforming tokenizer may
//! produce them) but the renderer rejects all three as unsupported.

/// A typed markdown token.
///
/// Inline payloads (`text`, code bodies, hrefs) carry raw text that may
/// still contain HTML entities; the renderer unescapes on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Paragraph {
        tokens: Vec<Token>,
    },
    Heading {
        /// 1-6.
        depth: usize,
        tokens: Vec<Token>,
    },
    Text {
        text: String,
    },
    Strong {
        tokens: Vec<Token>,
    },
    Em {
        tokens: Vec<Token>,
    },
    Del {
        tokens: Vec<Token>,
    },
    Link {
        href: String,
        title: Option<String>,
        /// Plain label text, used when `tokens` is empty.
        text: String,
        tokens: Vec<Token>,
    },
    Image {
        href: String,
        title: Option<String>,
        /// Alt text; image children are never rendered structurally.
        text: String,
    },
    /// Fenced or indented code block; `lang` is the fence info string,
    /// empty when absent. `text` carries no trailing newline.
    Code {
        lang: String,
        text: String,
    },
    Codespan {
        text: String,
    },
    Blockquote {
        tokens: Vec<Token>,
    },
    Hr,
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    /// Blank-line run between sibling blocks; `raw` is the newlines.
    Space {
        raw: String,
    },
    Br,
    /// Raw table source; passed through verbatim, never laid out.
    Table {
        raw: String,
    },
    /// Unsupported: fails the whole render.
    Html {
        raw: String,
    },
    /// Unsupported: fails the whole render.
    Def {
        raw: String,
    },
    /// Unsupported: fails the whole render.
    Escape {
        raw: String,
    },
}

/// One `list_item`. Items only occur inside [`Token::List`]; rendering one
/// needs the owning list's label and indent context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub tokens: Vec<Token>,
    /// `Some(true)` checked, `Some(false)` unchecked, `None` plain item.
    pub checked: Option<bool>,
}
