//! Integration tests for the rendering pipeline.
//!
//! These drive the full dispatch path on realistic message bodies: layout
//! tables, tracking pixels, preheaders, and MSO conditionals in one
//! document, the way marketing senders actually produce them.

use mailscribe_render::{Body, MimeKind, normalize, render};
use proptest::prelude::*;

/// A trimmed-down marketing email: outer layout table, preheader, MSO
/// conditional, tracking pixel, and real content mixed together.
const NEWSLETTER: &str = r#"<!DOCTYPE html>
<html>
<head><title>Ignore me</title><style>body { margin: 0; }</style></head>
<body>
<div class="preheader" style="display:none">Preview teaser text</div>
<!--[if mso]><table><tr><td>outlook scaffolding<![endif]-->
<table width="600" align="center" cellpadding="0" cellspacing="0">
  <tr><td>
    <h1>Welcome</h1>
    <p>This is inside a layout table.</p>
    <table role="presentation"><tr><td>
      <p>Nested <strong>content</strong> survives, see
         <a href="https://example.com/docs?a=1&amp;b=2">the docs</a>.</p>
    </td></tr></table>
    <img src="https://email.example.com/o/track?rcpt=42" width="1" height="1" alt="">
  </td></tr>
</table>
</body>
</html>"#;

#[test]
fn test_newsletter_renders_clean() {
    let output = render(NEWSLETTER, MimeKind::Html);

    assert!(output.starts_with("# Welcome"));
    assert!(output.contains("This is inside a layout table."));
    assert!(output.contains("Nested **content** survives"));
    assert!(output.contains("[the docs](https://example.com/docs?a=1&b=2)"));

    // Noise must be gone without a trace.
    assert!(!output.contains("Preview teaser"));
    assert!(!output.contains("outlook scaffolding"));
    assert!(!output.contains("Ignore me"));
    assert!(!output.contains("margin"));
    assert!(!output.contains("track?rcpt"));
    assert!(!output.contains('<'));
}

#[test]
fn test_layout_table_unwraps_exactly() {
    let html = r#"<table width="600"><tr><td><h1>Welcome</h1><p>This is inside a layout table.</p></td></tr></table>"#;
    assert_eq!(
        render(html, MimeKind::Html),
        "# Welcome\n\nThis is inside a layout table."
    );
}

#[test]
fn test_tracking_pixel_never_appears_in_any_position() {
    for html in [
        r#"<img src="https://t.example.com/a.gif" width="1" height="1"><p>after</p>"#,
        r#"<p>before</p><img src="https://t.example.com/a.gif" width="1" height="1">"#,
        r#"<p>be<img src="https://t.example.com/a.gif" width="1" height="1" alt="beacon">fore</p>"#,
    ] {
        let output = render(html, MimeKind::Html);
        assert!(!output.contains("image:"), "pixel leaked in {html}");
        assert!(!output.contains("beacon"), "alt leaked in {html}");
    }
    assert_eq!(
        render(
            r#"<p>be<img src="https://t.example.com/a.gif" width="1" height="1">fore</p>"#,
            MimeKind::Html
        ),
        "before"
    );
}

#[test]
fn test_quoted_history_survives_rendering() {
    // The forward path depends on rendering keeping everything.
    let html = "<p>New text</p><blockquote type=\"cite\"><p>Older message</p>\
                <blockquote><p>Oldest message</p></blockquote></blockquote>";
    let output = render(html, MimeKind::Html);
    assert!(output.contains("New text"));
    assert!(output.contains("> Older message"));
    assert!(output.contains("> > Oldest message"));
}

#[test]
fn test_plain_body_keeps_quotes_and_signature() {
    let plain = "Reply text\n\nOn Mon, Jan 5, 2026 at 9:00 AM Ana wrote:\n> earlier\n\n-- \nAna";
    assert_eq!(render(plain, MimeKind::Plain), plain);
}

#[test]
fn test_body_dispatch_matches_render() {
    let body = Body::new("<p>x &gt; y</p>", "text/html; charset=utf-8");
    assert_eq!(body.mime, MimeKind::Html);
    assert_eq!(body.render(), "x > y");
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(input in ".{0,300}") {
        let once = normalize(&input);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalize_leaves_no_basic_references(input in ".{0,300}") {
        let output = normalize(&input);
        for residue in ["&amp;", "&lt;", "&gt;", "&quot;", "&nbsp;"] {
            prop_assert!(!output.contains(residue));
        }
        prop_assert!(!output.chars().any(|c| matches!(
            c,
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'
        )), "output contained a zero-width character");
    }

    #[test]
    fn prop_render_never_panics(input in ".{0,400}") {
        let _ = render(&input, MimeKind::Html);
        let _ = render(&input, MimeKind::Plain);
    }

    #[test]
    fn prop_rendered_html_has_no_zero_width(input in ".{0,400}") {
        let output = render(&input, MimeKind::Html);
        prop_assert!(!output.chars().any(|c| matches!(
            c,
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'
        )), "rendered html contained a zero-width character");
    }
}
