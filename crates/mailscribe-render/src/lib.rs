//! # mailscribe-render
//!
//! Email body rendering for the mailscribe client: turns raw message
//! bodies (HTML or plain text, as retrieved from the mail API) into
//! de-noised, human-readable Markdown.
//!
//! ## Features
//!
//! - **Dispatch**: plain bodies pass through verbatim apart from
//!   normalization; HTML bodies run the full pipeline
//! - **Sanitization**: scripts, hidden elements, tracking pixels,
//!   preheader text, MSO conditional blocks, and layout tables are removed
//! - **Conversion**: a deterministic mapping from the sanitized tree to
//!   Markdown
//! - **Normalization**: character references decoded, zero-width
//!   characters stripped
//! - **Previews**: one-line snippets for message lists
//!
//! Rendering is information-preserving: quoted history and signatures stay
//! in the output, which is what the forward/send path requires. Use
//! `mailscribe-reply` to trim quoted history for interactive display.
//!
//! ## Quick Start
//!
//! ```
//! use mailscribe_render::Body;
//!
//! let body = Body::new("<p>It&#39;s ready &amp; waiting</p>", "text/html");
//! assert_eq!(body.render(), "It's ready & waiting");
//! ```
//!
//! Rendering never fails: malformed markup degrades to literal text, and
//! any input string is a valid input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod dom;
mod entity;
mod error;
mod markdown;
mod mime;
mod parse;
mod preview;
mod sanitize;

pub use dom::{Element, Node};
pub use entity::normalize;
pub use error::{Error, Result};
pub use markdown::to_markdown;
pub use mime::{ContentType, MimeKind};
pub use parse::parse;
pub use preview::snippet;
pub use sanitize::sanitize;

/// A message body as retrieved from the mail API.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    /// Raw body content.
    pub content: String,
    /// Body classification derived from the declared MIME type.
    pub mime: MimeKind,
}

impl Body {
    /// Creates a body from raw content and a declared MIME type string.
    ///
    /// The declared type is classified leniently; anything not recognizably
    /// HTML renders as plain text.
    #[must_use]
    pub fn new(content: impl Into<String>, declared_type: &str) -> Self {
        Self {
            content: content.into(),
            mime: MimeKind::from_declared(declared_type),
        }
    }

    /// Renders the body to normalized Markdown.
    ///
    /// The output preserves every textual unit of the input, including
    /// quoted history and signatures, and is safe to forward verbatim.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.content, self.mime)
    }
}

/// Renders body content to normalized Markdown.
///
/// HTML input is parsed, sanitized, converted, and normalized; plain input
/// is normalized and otherwise returned verbatim. The output carries no
/// residual character references and no zero-width characters.
#[must_use]
pub fn render(content: &str, mime: MimeKind) -> String {
    match mime {
        MimeKind::Html => {
            tracing::trace!(len = content.len(), "rendering html body");
            let tree = sanitize::sanitize(parse::parse(content));
            entity::normalize(&markdown::to_markdown(&tree))
        }
        MimeKind::Plain => entity::normalize(content),
    }
}
