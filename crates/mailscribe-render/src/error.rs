//! Error types for the rendering crate.

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from strict MIME content-type parsing.
///
/// Rendering itself is total: any string input is a valid input and
/// produces output. Only the strict [`crate::ContentType`] parser is
/// fallible, and the lenient dispatch path never propagates it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The content type string was empty.
    #[error("empty content type")]
    EmptyContentType,

    /// The content type did not have the `type/subtype` shape.
    #[error("invalid content type: {0}")]
    InvalidContentType(String),
}
