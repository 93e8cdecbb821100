//! # mdflat-core
//!
//! Flattens parsed Markdown into plain display lines plus byte-addressed
//! attribute spans, for a display/highlight layer to consume.
//!
//! The output is two aligned artifacts:
//! - `text`: the document with markup syntax removed or replaced with
//!   display equivalents (list bullets, blockquote prefixes), one string
//!   per line;
//! - `attrs`: where titles, emphasis, links, code, and rules live in that
//!   text, in 1-indexed line / byte-column coordinates.
//!
//! # Architecture
//!
//! ```text
//! markdown source
//!       |  tokenizer (pulldown-cmark, GFM rule set)
//!       v
//! token tree (closed kind set)
//!       |  renderer (recursive flattener, delta-shift merges)
//!       v
//! RenderOutput { text, attrs }
//! ```
//!
//! Rendering is synchronous and pure: a renderer instance owns its buffers
//! for one pass, nested constructs render into fresh instances merged back
//! by position delta, and a call either produces a fully consistent result
//! or fails with no output at all.

pub mod attr;
mod entities;
pub mod error;
pub mod position;
pub mod renderer;
pub mod token;
pub mod tokenizer;

pub use attr::{KIND_NAMES, TextAttrItem};
pub use error::{Error, RenderError};
pub use position::{Pos, Range};
pub use renderer::{RenderOutput, render};
pub use token::{ListItem, Token};
pub use tokenizer::tokenize;

use tracing::debug;

/// Render raw markdown: tokenize with the extended ("GitHub-flavored")
/// rule set, flatten, trim trailing blank lines.
///
/// An unsupported construct fails the whole call with [`Error::Internal`],
/// which carries the original input for triage; no partial output is ever
/// returned.
pub fn render_markdown(source: &str) -> Result<RenderOutput, Error> {
    debug!(bytes = source.len(), "rendering markdown");
    let tokens = tokenizer::tokenize(source);
    renderer::render(&tokens).map_err(|err| Error::Internal {
        source: err,
        input: source.to_owned(),
    })
}
