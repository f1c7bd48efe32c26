//! Tolerant HTML parser.
//!
//! Real email markup is routinely malformed: unclosed tags, mismatched
//! close tags, attribute soup, stray conditional comments. This parser
//! never fails — anything it cannot interpret as markup becomes literal
//! text, and the open-element stack closes whatever is left at end of
//! input.

use crate::dom::{Element, Node};
use std::collections::HashMap;

/// Elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text running to the matching close tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parses an HTML fragment into a forest of nodes.
///
/// Ordinary comments, doctype declarations, and CDATA sections are dropped
/// during tree construction. MSO conditional blocks are recognized here as
/// well: the downlevel-hidden form is a single comment, and the bare
/// `<![if mso]>...<![endif]>` form skips to its matching endif.
#[must_use]
pub fn parse(input: &str) -> Vec<Node> {
    Parser::new(input).parse_all()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse_all(mut self) -> Vec<Node> {
        // Index 0 is a synthetic root that collects top-level nodes.
        let mut stack: Vec<Element> = vec![Element::new("")];

        while !self.is_eof() {
            if self.peek_byte() == Some(b'<') {
                self.markup(&mut stack);
            } else {
                self.text(&mut stack);
            }
        }

        while stack.len() > 1 {
            pop_element(&mut stack);
        }
        stack.pop().map_or_else(Vec::new, |root| root.children)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let skip = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        self.pos += skip;
    }

    fn markup(&mut self, stack: &mut Vec<Element>) {
        if self.starts_with("<!--") {
            self.skip_comment();
        } else if self.starts_with("<![") {
            self.skip_conditional();
        } else if self.starts_with("<!") || self.starts_with("<?") {
            self.skip_declaration();
        } else if self.starts_with("</") {
            self.close_tag(stack);
        } else if self.rest()[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.open_tag(stack);
        } else {
            // A `<` that introduces no markup is literal text.
            push_text(stack, "<");
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        self.pos += 4;
        match self.rest().find("-->") {
            Some(end) => self.pos += end + 3,
            None => self.pos = self.input.len(),
        }
    }

    /// Handles `<![...]>` markup declarations.
    ///
    /// `<![if mso]>` content is Outlook-only markup, skipped through the
    /// matching `<![endif]>`. `<![if !mso]>` and `<![endif]>` drop only
    /// the marker itself, leaving the content in the flow. CDATA sections
    /// are dropped whole.
    fn skip_conditional(&mut self) {
        if self.starts_with("<![CDATA[") {
            self.pos += 9;
            match self.rest().find("]]>") {
                Some(end) => self.pos += end + 3,
                None => self.pos = self.input.len(),
            }
            return;
        }
        self.pos += 3;
        let Some(end) = self.rest().find("]>") else {
            self.pos = self.input.len();
            return;
        };
        let directive = self.rest()[..end].to_ascii_lowercase();
        self.pos += end + 2;
        if directive.starts_with("if") && directive.contains("mso") && !directive.contains("!mso") {
            match find_ignore_case(self.rest(), "<![endif]>") {
                Some(rel) => self.pos += rel + "<![endif]>".len(),
                None => self.pos = self.input.len(),
            }
        }
    }

    fn skip_declaration(&mut self) {
        match self.rest().find('>') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.input.len(),
        }
    }

    fn close_tag(&mut self, stack: &mut Vec<Element>) {
        self.pos += 2;
        let name = self.read_tag_name();
        match self.rest().find('>') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.input.len(),
        }
        if name.is_empty() {
            return;
        }
        // Pop through the matching open element; a close tag with no match
        // is ignored.
        if let Some(depth) = stack.iter().rposition(|el| el.tag == name)
            && depth > 0
        {
            while stack.len() > depth {
                pop_element(stack);
            }
        }
    }

    fn open_tag(&mut self, stack: &mut Vec<Element>) {
        self.pos += 1;
        let tag = self.read_tag_name();
        let (attributes, self_closing) = self.read_attributes();

        loop {
            let implied = stack.len() > 1
                && stack
                    .last()
                    .is_some_and(|open| closes_implied(&open.tag, &tag));
            if !implied {
                break;
            }
            pop_element(stack);
        }

        let mut element = Element {
            tag,
            attributes,
            children: Vec::new(),
        };

        if RAW_TEXT_ELEMENTS.contains(&element.tag.as_str()) && !self_closing {
            let close = format!("</{}", element.tag);
            let content_len = find_ignore_case(self.rest(), &close).unwrap_or(self.rest().len());
            let content = self.rest()[..content_len].to_string();
            self.pos += content_len;
            if !self.is_eof() {
                self.pos += close.len();
                match self.rest().find('>') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.input.len(),
                }
            }
            if !content.is_empty() {
                element.children.push(Node::Text(content));
            }
            push_element(stack, element);
            return;
        }

        if self_closing || VOID_ELEMENTS.contains(&element.tag.as_str()) {
            push_element(stack, element);
        } else {
            stack.push(element);
        }
    }

    fn read_tag_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
            .unwrap_or(rest.len());
        let name = rest[..end].to_ascii_lowercase();
        self.pos += end;
        name
    }

    fn read_attributes(&mut self) -> (HashMap<String, String>, bool) {
        let mut attributes = HashMap::new();
        loop {
            self.skip_whitespace();
            match self.peek_byte() {
                None => return (attributes, false),
                Some(b'>') => {
                    self.pos += 1;
                    return (attributes, false);
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.peek_byte() == Some(b'>') {
                        self.pos += 1;
                        return (attributes, true);
                    }
                }
                Some(_) => {
                    let name = self.read_attr_name();
                    if name.is_empty() {
                        self.advance_char();
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.peek_byte() == Some(b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.read_attr_value()
                    } else {
                        String::new()
                    };
                    // First occurrence of a duplicated attribute wins.
                    attributes.entry(name).or_insert(value);
                }
            }
        }
    }

    fn read_attr_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let name = rest[..end].to_ascii_lowercase();
        self.pos += end;
        name
    }

    fn read_attr_value(&mut self) -> String {
        match self.peek_byte() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let rest = self.rest();
                let end = rest.find(quote as char).unwrap_or(rest.len());
                let value = rest[..end].to_string();
                self.pos += end;
                if !self.is_eof() {
                    self.pos += 1;
                }
                value
            }
            _ => {
                let rest = self.rest();
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                let value = rest[..end].to_string();
                self.pos += end;
                value
            }
        }
    }

    fn text(&mut self, stack: &mut [Element]) {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        let text = rest[..end].to_string();
        self.pos += end;
        push_text(stack, &text);
    }
}

/// Returns true when an incoming open tag implies closing the current one,
/// e.g. `<li>` ends a preceding unclosed `<li>`.
fn closes_implied(open: &str, incoming: &str) -> bool {
    match incoming {
        "li" => open == "li",
        "tr" => matches!(open, "tr" | "td" | "th"),
        "td" | "th" => matches!(open, "td" | "th"),
        "dt" | "dd" => matches!(open, "dt" | "dd"),
        "option" => open == "option",
        "p" | "div" | "ul" | "ol" | "table" | "blockquote" | "pre" | "hr" | "h1" | "h2" | "h3"
        | "h4" | "h5" | "h6" => open == "p",
        _ => false,
    }
}

fn pop_element(stack: &mut Vec<Element>) {
    if let Some(el) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(Node::Element(el));
    }
}

fn push_element(stack: &mut [Element], element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        if let Some(Node::Text(existing)) = parent.children.last_mut() {
            existing.push_str(text);
        } else {
            parent.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Byte-wise case-insensitive substring search for an ASCII needle.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    h.windows(n.len()).position(|w| w.eq_ignore_ascii_case(n))
}
