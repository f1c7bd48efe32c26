//! HTML tree to Markdown conversion: the mapping pass.
//!
//! A total structural mapping from sanitized nodes to Markdown text. Every
//! node kind renders deterministically; unknown elements are transparent
//! containers. A final pass collapses blank-line runs to one and trims the
//! result.

use crate::dom::{Element, Node};

/// Converts a sanitized node forest to Markdown.
#[must_use]
pub fn to_markdown(nodes: &[Node]) -> String {
    let mut writer = Writer::default();
    render_nodes(nodes, &mut writer);
    finish(&writer.out)
}

/// Accumulates Markdown output with block/inline spacing discipline.
#[derive(Default)]
struct Writer {
    out: String,
}

impl Writer {
    /// Ends the current block: trailing spaces go, and the output is left
    /// sitting on a blank line.
    fn break_block(&mut self) {
        self.trim_line_end();
        if self.out.is_empty() {
            return;
        }
        while !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn trim_line_end(&mut self) {
        while self.out.ends_with(' ') {
            self.out.pop();
        }
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// Inserts a single separating space unless one is already pending or
    /// a new line just started.
    fn soft_space(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with([' ', '\n']) {
            self.out.push(' ');
        }
    }

    /// Appends a text run with internal whitespace collapsed.
    fn push_text(&mut self, text: &str) {
        let mut words = text.split_whitespace();
        let Some(first) = words.next() else {
            // Whitespace-only runs still separate words.
            if !text.is_empty() {
                self.soft_space();
            }
            return;
        };
        if text.starts_with(|c: char| c.is_whitespace()) {
            self.soft_space();
        }
        self.out.push_str(first);
        for word in words {
            self.out.push(' ');
            self.out.push_str(word);
        }
        if text.ends_with(|c: char| c.is_whitespace()) {
            self.out.push(' ');
        }
    }

    /// Appends an inline fragment, reattaching boundary whitespace outside
    /// the produced markers.
    fn push_fragment(&mut self, lead: bool, body: &str, trail: bool) {
        if body.is_empty() {
            if lead || trail {
                self.soft_space();
            }
            return;
        }
        if lead {
            self.soft_space();
        }
        self.out.push_str(body);
        if trail {
            self.out.push(' ');
        }
    }
}

fn render_nodes(nodes: &[Node], w: &mut Writer) {
    for node in nodes {
        render_node(node, w);
    }
}

fn render_node(node: &Node, w: &mut Writer) {
    match node {
        Node::Text(text) => w.push_text(text),
        Node::Element(el) => render_element(el, w),
    }
}

fn render_element(el: &Element, w: &mut Writer) {
    match el.tag.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = el.tag[1..].parse::<usize>().unwrap_or(1);
            let (_, text, _) = render_inline(&el.children);
            if !text.is_empty() {
                w.break_block();
                w.push_line(&format!("{} {text}", "#".repeat(level)));
                w.break_block();
            }
        }
        "p" | "div" | "section" | "article" | "aside" | "header" | "footer" | "main" | "nav"
        | "figure" | "figcaption" | "center" | "address" | "form" | "fieldset" | "details"
        | "summary" => {
            w.break_block();
            render_nodes(&el.children, w);
            w.break_block();
        }
        "br" => {
            w.trim_line_end();
            w.out.push('\n');
        }
        "hr" => {
            w.break_block();
            w.push_line("---");
            w.break_block();
        }
        "strong" | "b" => emphasis(el, w, "**"),
        "em" | "i" => emphasis(el, w, "*"),
        "code" => {
            let (lead, text, trail) = render_inline(&el.children);
            if !text.is_empty() {
                w.push_fragment(lead, &format!("`{text}`"), trail);
            }
        }
        "pre" => {
            let mut raw = String::new();
            collect_raw_text(&el.children, &mut raw);
            w.break_block();
            w.push_line("```");
            w.push_line(raw.trim_matches('\n'));
            w.push_line("```");
            w.break_block();
        }
        "a" => render_link(el, w),
        "img" => {
            if let Some(alt) = el.attr("alt") {
                let alt = alt.trim();
                if !alt.is_empty() {
                    w.push_fragment(false, &format!("[image: {alt}]"), false);
                }
            }
        }
        "ul" => render_list(el, w, None),
        "ol" => {
            let start = el
                .attr("start")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            render_list(el, w, Some(start));
        }
        "blockquote" => {
            w.break_block();
            let inner = render_block(&el.children);
            for line in inner.lines() {
                if line.is_empty() {
                    w.push_line(">");
                } else {
                    w.push_line(&format!("> {line}"));
                }
            }
            w.break_block();
        }
        "table" => render_table(el, w),
        // Structure that escaped its container renders as a plain block.
        "li" | "td" | "th" | "tr" => {
            w.break_block();
            render_nodes(&el.children, w);
            w.break_block();
        }
        _ => render_nodes(&el.children, w),
    }
}

fn emphasis(el: &Element, w: &mut Writer, marker: &str) {
    let (lead, text, trail) = render_inline(&el.children);
    if !text.is_empty() {
        w.push_fragment(lead, &format!("{marker}{text}{marker}"), trail);
    }
}

fn render_link(el: &Element, w: &mut Writer) {
    let (lead, text, trail) = render_inline(&el.children);
    let href = el.attr("href").map(str::trim).unwrap_or_default();
    if text.is_empty() && href.is_empty() {
        return;
    }
    // Fragment-only anchors and autolinks carry no information beyond
    // their text.
    let body = if href.is_empty() || href.starts_with('#') || text == href {
        if text.is_empty() {
            href.to_string()
        } else {
            text
        }
    } else if text.is_empty() {
        href.to_string()
    } else {
        format!("[{text}]({href})")
    };
    w.push_fragment(lead, &body, trail);
}

fn render_list(el: &Element, w: &mut Writer, start: Option<u64>) {
    w.break_block();
    let mut index = start.unwrap_or(0);
    for child in &el.children {
        let Node::Element(item) = child else {
            continue;
        };
        if item.tag != "li" {
            render_node(child, w);
            continue;
        }
        let marker = if start.is_some() {
            let m = format!("{index}. ");
            index += 1;
            m
        } else {
            "* ".to_string()
        };
        let body = render_block(&item.children);
        let mut first = true;
        for line in body.lines().filter(|line| !line.is_empty()) {
            if first {
                w.push_line(&format!("{marker}{line}"));
                first = false;
            } else {
                w.push_line(&format!("  {line}"));
            }
        }
    }
    w.break_block();
}

fn render_table(el: &Element, w: &mut Writer) {
    w.break_block();
    let mut rows = Vec::new();
    collect_rows(el, &mut rows);
    if rows.is_empty() {
        // A table without rows still may hold content; degrade to flow.
        render_nodes(&el.children, w);
        w.break_block();
        return;
    }
    for child in &el.children {
        if let Node::Element(e) = child
            && e.tag == "caption"
        {
            let (_, text, _) = render_inline(&e.children);
            if !text.is_empty() {
                w.push_line(&text);
            }
        }
    }
    for row in rows {
        let mut cells = Vec::new();
        for child in &row.children {
            if let Node::Element(cell) = child
                && matches!(cell.tag.as_str(), "td" | "th")
            {
                let (_, text, _) = render_inline(&cell.children);
                if !text.is_empty() {
                    cells.push(text);
                }
            }
        }
        if !cells.is_empty() {
            w.push_line(&cells.join(" "));
        }
    }
    w.break_block();
}

fn collect_rows<'a>(el: &'a Element, rows: &mut Vec<&'a Element>) {
    for child in &el.children {
        if let Node::Element(e) = child {
            match e.tag.as_str() {
                "thead" | "tbody" | "tfoot" => collect_rows(e, rows),
                "tr" => rows.push(e),
                _ => {}
            }
        }
    }
}

/// Renders children in a fresh writer and flattens the result to one line,
/// reporting whether boundary whitespace was present in the source.
fn render_inline(nodes: &[Node]) -> (bool, String, bool) {
    let mut w = Writer::default();
    render_nodes(nodes, &mut w);
    let words: Vec<&str> = w.out.split_whitespace().collect();
    (starts_with_ws(nodes), words.join(" "), ends_with_ws(nodes))
}

fn starts_with_ws(nodes: &[Node]) -> bool {
    match nodes.first() {
        Some(Node::Text(t)) => t.starts_with(|c: char| c.is_whitespace()),
        Some(Node::Element(el)) => starts_with_ws(&el.children),
        None => false,
    }
}

fn ends_with_ws(nodes: &[Node]) -> bool {
    match nodes.last() {
        Some(Node::Text(t)) => t.ends_with(|c: char| c.is_whitespace()),
        Some(Node::Element(el)) => ends_with_ws(&el.children),
        None => false,
    }
}

/// Renders children as a standalone block of Markdown.
fn render_block(nodes: &[Node]) -> String {
    let mut w = Writer::default();
    render_nodes(nodes, &mut w);
    finish(&w.out)
}

fn collect_raw_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if el.tag == "br" {
                    out.push('\n');
                } else {
                    collect_raw_text(&el.children, out);
                }
            }
        }
    }
}

/// Collapses blank-line runs to exactly one and trims the result.
fn finish(out: &str) -> String {
    let mut result = String::with_capacity(out.len());
    let mut pending_blank = false;
    for line in out.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = true;
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
            if pending_blank {
                result.push('\n');
            }
        }
        pending_blank = false;
        result.push_str(line);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn convert(html: &str) -> String {
        to_markdown(&parse(html))
    }

    #[test]
    fn test_headings() {
        assert_eq!(convert("<h1>Title</h1>"), "# Title");
        assert_eq!(convert("<h3>Sub</h3>"), "### Sub");
        assert_eq!(convert("<h6>Deep</h6>"), "###### Deep");
    }

    #[test]
    fn test_paragraphs_blank_line_separated() {
        assert_eq!(convert("<p>one</p><p>two</p>"), "one\n\ntwo");
    }

    #[test]
    fn test_divs_and_bare_text_mix() {
        assert_eq!(convert("before<div>inside</div>after"), "before\n\ninside\n\nafter");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(convert("<p><strong>bold</strong></p>"), "**bold**");
        assert_eq!(convert("<p><b>bold</b> and <i>italic</i></p>"), "**bold** and *italic*");
        assert_eq!(convert("<p>a <em>b</em> c</p>"), "a *b* c");
    }

    #[test]
    fn test_emphasis_boundary_whitespace_moves_out() {
        assert_eq!(convert("<p>a<strong> b</strong>c</p>"), "a **b**c");
        assert_eq!(convert("<p><em>x </em>y</p>"), "*x* y");
    }

    #[test]
    fn test_empty_emphasis_dropped() {
        assert_eq!(convert("<p>a<strong></strong>b</p>"), "ab");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            convert(r#"<p><a href="https://example.com">site</a></p>"#),
            "[site](https://example.com)"
        );
        assert_eq!(
            convert(r#"<p><a href="https://example.com">https://example.com</a></p>"#),
            "https://example.com"
        );
        assert_eq!(convert(r##"<p><a href="#top">back</a></p>"##), "back");
        assert_eq!(convert("<p><a>text</a></p>"), "text");
    }

    #[test]
    fn test_image_alt() {
        assert_eq!(convert(r#"<p><img src="x.png" alt="A sunset"></p>"#), "[image: A sunset]");
        assert_eq!(convert(r#"<p>a<img src="x.png">b</p>"#), "ab");
        assert_eq!(convert(r#"<p>a<img src="x.png" alt="">b</p>"#), "ab");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(convert("<ul><li>a</li><li>b</li></ul>"), "* a\n* b");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(convert("<ol><li>x</li><li>y</li><li>z</li></ol>"), "1. x\n2. y\n3. z");
    }

    #[test]
    fn test_ordered_list_start_attribute() {
        assert_eq!(convert(r#"<ol start="3"><li>c</li><li>d</li></ol>"#), "3. c\n4. d");
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            convert("<ul><li>a<ul><li>inner</li></ul></li><li>b</li></ul>"),
            "* a\n  * inner\n* b"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(convert("<blockquote>quoted</blockquote>"), "> quoted");
        assert_eq!(
            convert("<blockquote><p>one</p><p>two</p></blockquote>"),
            "> one\n>\n> two"
        );
    }

    #[test]
    fn test_nested_blockquote_deepens() {
        assert_eq!(
            convert("<blockquote>a<blockquote>b</blockquote></blockquote>"),
            "> a\n>\n> > b"
        );
    }

    #[test]
    fn test_cite_blockquote() {
        assert_eq!(convert(r#"<blockquote type="cite">old</blockquote>"#), "> old");
    }

    #[test]
    fn test_line_break_and_rule() {
        assert_eq!(convert("<p>a<br>b</p>"), "a\nb");
        assert_eq!(convert("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
    }

    #[test]
    fn test_inline_code_and_pre() {
        assert_eq!(convert("<p>run <code>make</code> now</p>"), "run `make` now");
        assert_eq!(
            convert("<pre>let x = 1;\nlet y = 2;</pre>"),
            "```\nlet x = 1;\nlet y = 2;\n```"
        );
    }

    #[test]
    fn test_data_table_rows() {
        assert_eq!(
            convert("<table><tr><th>Name</th><th>Qty</th></tr><tr><td>Bolt</td><td>4</td></tr></table>"),
            "Name Qty\nBolt 4"
        );
    }

    #[test]
    fn test_rowless_table_degrades_to_flow() {
        assert_eq!(convert("<table><td>orphan cell</td></table>"), "orphan cell");
        assert_eq!(convert("<table>loose text</table>"), "loose text");
    }

    #[test]
    fn test_table_caption_kept() {
        assert_eq!(
            convert("<table><caption>Parts</caption><tr><td>Bolt</td><td>4</td></tr></table>"),
            "Parts\nBolt 4"
        );
    }

    #[test]
    fn test_unknown_element_transparent() {
        assert_eq!(convert("<p><font color=\"red\">warm</font> text</p>"), "warm text");
        assert_eq!(convert("<custom-thing>inside</custom-thing>"), "inside");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(convert("<p>a\n   b\t\tc</p>"), "a b c");
        assert_eq!(convert("<p>  spaced  </p>"), "spaced");
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        assert_eq!(convert("<div><p>a</p></div><div><div><p>b</p></div></div>"), "a\n\nb");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), "");
        assert_eq!(convert("<div></div>"), "");
    }
}
