//! Error types for the flattening renderer.

use thiserror::Error;

/// Failure raised while flattening a token tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The token tree contained a construct the renderer does not handle
    /// (`html`, `def`, `escape`).
    ///
    /// Always fatal to the whole render call; no partial output escapes,
    /// so every emitted attribute range keeps addressing text that exists.
    /// `raw` carries the offending source text for triage.
    #[error("not implemented: `{kind}` token: {raw}")]
    Unsupported { kind: &'static str, raw: String },
}

/// Top-level failure for [`render_markdown`](crate::render_markdown).
#[derive(Debug, Error)]
pub enum Error {
    /// An unsupported construct was hit. This is an internal limitation of
    /// the renderer, not malformed input; the full input is attached so the
    /// failure can be reported and reproduced.
    #[error(
        "markdown rendering hit an internal limitation (please report this): {source}\n\
         --- input ---\n{input}"
    )]
    Internal {
        source: RenderError,
        input: String,
    },
}
