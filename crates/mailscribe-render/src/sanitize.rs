//! Structural sanitizer: the filter pass over the parsed tree.
//!
//! Marketing and client-generated HTML buries the message in noise:
//! scripts, hidden preview text, tracking pixels, and deeply nested layout
//! tables. This pass removes the noise nodes and flattens layout tables so
//! the converter sees only content.

use crate::dom::{Element, Node};

/// Tags whose whole subtree is noise.
const NOISE_TAGS: &[&str] = &["script", "style", "head", "title"];

/// URL fragments that identify tracker/beacon/analytics images.
const TRACKER_URL_HINTS: &[&str] = &[
    "/track",
    "track.",
    "tracking",
    "beacon",
    "pixel",
    "analytics",
    "doubleclick.net",
    "/open?",
    "open.aspx",
];

/// Removes noise nodes and unwraps layout tables.
///
/// Applied recursively: cell content hoisted out of a layout table is
/// sanitized again, so tables nested inside other layout tables unwrap
/// too.
#[must_use]
pub fn sanitize(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        push_sanitized(node, &mut out);
    }
    out
}

fn push_sanitized(node: Node, out: &mut Vec<Node>) {
    match node {
        Node::Text(text) => out.push(Node::Text(text)),
        Node::Element(el) => {
            if is_noise(&el) {
                tracing::trace!(tag = %el.tag, "dropped noise element");
                return;
            }
            if el.tag == "table" && is_layout_table(&el) {
                tracing::trace!("unwrapped layout table");
                unwrap_layout_table(el, out);
                return;
            }
            let mut kept = Element {
                tag: el.tag,
                attributes: el.attributes,
                children: Vec::with_capacity(el.children.len()),
            };
            for child in el.children {
                push_sanitized(child, &mut kept.children);
            }
            out.push(Node::Element(kept));
        }
    }
}

fn is_noise(el: &Element) -> bool {
    NOISE_TAGS.contains(&el.tag.as_str())
        || is_hidden(el)
        || is_preheader(el)
        || (el.tag == "img" && is_tracking_pixel(el))
}

/// Checks the inline style for `display:none` or `mso-hide:all`.
fn is_hidden(el: &Element) -> bool {
    el.attr("style").is_some_and(|style| {
        let style = squash(style);
        style.contains("display:none") || style.contains("mso-hide:all")
    })
}

/// Recognizes hidden preview text meant only for inbox-list snippets.
fn is_preheader(el: &Element) -> bool {
    let marked = |attr: Option<&str>| {
        attr.is_some_and(|value| value.to_ascii_lowercase().contains("preheader"))
    };
    if marked(el.attr("class")) || marked(el.attr("id")) {
        return true;
    }
    el.attr("style").is_some_and(|style| {
        let style = squash(style);
        style.contains("max-height:0") && style.contains("overflow:hidden")
    })
}

fn is_tracking_pixel(el: &Element) -> bool {
    if dimension_at_most_one(el.attr("width")) || dimension_at_most_one(el.attr("height")) {
        return true;
    }
    el.attr("src").is_some_and(|src| {
        let src = src.to_ascii_lowercase();
        TRACKER_URL_HINTS.iter().any(|hint| src.contains(hint))
    })
}

/// Parses a width/height attribute; `1`, `0`, and `1px` all count.
fn dimension_at_most_one(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim().trim_end_matches("px");
        v.parse::<f64>().is_ok_and(|n| n <= 1.0)
    })
}

/// Layout heuristics: presentational tables carry sizing/alignment
/// attributes or say so outright via `role`.
fn is_layout_table(el: &Element) -> bool {
    el.has_attr("width")
        || el.has_attr("cellpadding")
        || el.has_attr("cellspacing")
        || el
            .attr("align")
            .is_some_and(|v| v.eq_ignore_ascii_case("center"))
        || el
            .attr("role")
            .is_some_and(|v| v.eq_ignore_ascii_case("presentation"))
}

/// Discards table/row/cell structure, hoisting cell content into the
/// surrounding flow in document order.
fn unwrap_layout_table(el: Element, out: &mut Vec<Node>) {
    for child in el.children {
        match child {
            Node::Element(e) => match e.tag.as_str() {
                "thead" | "tbody" | "tfoot" | "tr" => unwrap_layout_table(e, out),
                "td" | "th" | "caption" => {
                    for inner in e.children {
                        push_sanitized(inner, out);
                    }
                }
                "col" | "colgroup" => {}
                _ => push_sanitized(Node::Element(e), out),
            },
            Node::Text(text) => {
                // Indentation between structural tags is not content.
                if !text.trim().is_empty() {
                    out.push(Node::Text(text));
                }
            }
        }
    }
}

/// Lowercases and removes whitespace so `display : none` still matches.
fn squash(style: &str) -> String {
    style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}
