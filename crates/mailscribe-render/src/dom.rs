//! Ephemeral markup tree built during HTML rendering.
//!
//! Nodes exist only for the duration of a single render call: the parser
//! builds the tree, the sanitizer filters it, the converter consumes it.
//! Nothing here is persisted or shared.

use std::collections::HashMap;

/// A parsed markup node: an element with children, or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element such as `<p>` with attributes and child nodes.
    Element(Element),
    /// A text run. Character references are still literal at this stage;
    /// they decode in the final normalization pass.
    Text(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercased by the parser.
    pub tag: String,
    /// Attributes with lowercased names; the first occurrence of a
    /// duplicated attribute wins.
    pub attributes: HashMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Returns an attribute value by case-insensitive name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true if the attribute is present, regardless of value.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_ascii_lowercase())
    }
}
