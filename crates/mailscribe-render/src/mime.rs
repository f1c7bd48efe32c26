//! MIME content-type classification.
//!
//! The mail API reports body parts with raw `Content-Type` values such as
//! `text/html; charset=utf-8`. Rendering only needs to know whether a body
//! is HTML or plain text: [`MimeKind::from_declared`] is the total, lenient
//! classification used by the dispatcher, built on the strict
//! [`ContentType`] parser.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Parsed MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type, lowercased (e.g. `text`).
    pub main_type: String,
    /// Subtype, lowercased (e.g. `html`).
    pub sub_type: String,
    parameters: HashMap<String, String>,
}

impl ContentType {
    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value2"`. Type,
    /// subtype, and parameter names are lowercased; parameter values keep
    /// their case with surrounding quotes removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or missing the
    /// `type/subtype` shape.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');
        let type_part = parts.next().unwrap_or_default().trim();
        if type_part.is_empty() {
            return Err(Error::EmptyContentType);
        }
        let Some((main, sub)) = type_part.split_once('/') else {
            return Err(Error::InvalidContentType(type_part.to_string()));
        };
        let main_type = main.trim().to_ascii_lowercase();
        let sub_type = sub.trim().to_ascii_lowercase();
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(type_part.to_string()));
        }

        let mut parameters = HashMap::new();
        for param in parts {
            if let Some((key, value)) = param.split_once('=') {
                parameters.insert(
                    key.trim().to_ascii_lowercase(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        Ok(Self {
            main_type,
            sub_type,
            parameters,
        })
    }

    /// Returns a parameter value by case-insensitive name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Checks whether this content type carries HTML.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.main_type == "text" && self.sub_type == "html"
            || self.sub_type == "xhtml+xml"
    }

    /// Checks whether this content type carries plain text.
    #[must_use]
    pub fn is_plain_text(&self) -> bool {
        self.main_type == "text" && self.sub_type == "plain"
    }
}

/// Body classification used by the renderer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MimeKind {
    /// Plain text: rendered verbatim apart from normalization.
    #[default]
    Plain,
    /// HTML: parsed, sanitized, and converted to Markdown.
    Html,
}

impl MimeKind {
    /// Classifies a declared MIME type leniently.
    ///
    /// Accepts full content types (`text/html; charset=utf-8`), bare
    /// subtype tags (`html`, `plain`), and arbitrary garbage. Anything not
    /// recognizably HTML is treated as plain text, per the renderer
    /// contract.
    #[must_use]
    pub fn from_declared(declared: &str) -> Self {
        let trimmed = declared.trim();
        if trimmed.eq_ignore_ascii_case("html") {
            return Self::Html;
        }
        if let Ok(ct) = ContentType::parse(trimmed)
            && ct.is_html()
        {
            return Self::Html;
        }
        Self::Plain
    }
}
