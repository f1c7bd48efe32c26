//! Reply-boundary detection over rendered or plain-text lines.
//!
//! Interactive thread display shows each message without the history it
//! re-quotes from earlier messages. The detector scans top-down and cuts
//! at the first confirmed boundary. This is intentionally lossy: the
//! forward/send path must never call it.

use crate::locale;

/// Header fields that identify a forwarded message.
const FORWARD_HEADER_FIELDS: &[&str] =
    &["From:", "Date:", "Sent:", "Subject:", "To:", "Cc:", "Reply-To:"];

/// Phrase prefixes mobile clients append as a final-paragraph signature.
const MOBILE_SIGNATURE_PREFIXES: &[&str] =
    &["Sent from my ", "Get Outlook for ", "Sent from Mail for "];

/// What the scanner found.
enum Boundary {
    /// Cut strictly before this line index.
    Before(usize),
    /// Forwarded-message delimiter at this index; the header lines after
    /// it are retained, the forwarded body after them is cut.
    Forward(usize),
}

/// Extracts the new, human-authored portion of a message.
///
/// Everything from the first confirmed boundary on is discarded: locale
/// attribution headers, quoted blocks following prior content, forwarded
/// bodies (their identifying header lines are kept), signature
/// separators, and trailing mobile-client signatures. Only the blank line
/// introducing the boundary is trimmed; input with no boundary comes back
/// unchanged, and fully-quoted input yields the empty string.
#[must_use]
pub fn visible_reply(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = input.lines().collect();

    // A message that is nothing but quoted lines has no visible reply.
    if lines.iter().any(|line| is_quoted(line))
        && lines
            .iter()
            .all(|line| is_quoted(line) || line.trim().is_empty())
    {
        return String::new();
    }

    match find_boundary(&lines) {
        Some(Boundary::Before(index)) => cut_before(&lines, index),
        Some(Boundary::Forward(delimiter)) => keep_forward_header(&lines, delimiter),
        None => input.to_string(),
    }
}

fn find_boundary(lines: &[&str]) -> Option<Boundary> {
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(matcher) = locale::match_attribution(line) {
            tracing::debug!(locale = matcher.locale, line = i, "attribution header");
            return Some(Boundary::Before(i));
        }
        if is_forward_delimiter(line) {
            tracing::debug!(line = i, "forwarded message delimiter");
            return Some(Boundary::Forward(i));
        }
        if is_signature_separator(line) {
            return Some(Boundary::Before(i));
        }
        if is_mobile_signature(line) && lines[i + 1..].iter().all(|rest| rest.trim().is_empty()) {
            return Some(Boundary::Before(i));
        }
        if is_quoted(line) {
            let run = lines[i..].iter().take_while(|l| is_quoted(l)).count();
            let has_prior = lines[..i].iter().any(|l| !l.trim().is_empty());
            if run >= 2 && has_prior {
                tracing::debug!(line = i, run, "quoted block");
                return Some(Boundary::Before(i));
            }
            // A lone quoted line with no introducing marker stays: quote
            // intent cannot be inferred from `>` alone.
            i += run;
            continue;
        }
        i += 1;
    }
    None
}

fn is_quoted(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

fn is_signature_separator(line: &str) -> bool {
    line == "--" || line == "-- "
}

fn is_forward_delimiter(line: &str) -> bool {
    line.contains("Forwarded message")
}

fn is_mobile_signature(line: &str) -> bool {
    let line = line.trim();
    line.len() <= 60
        && MOBILE_SIGNATURE_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

fn is_forward_header_field(line: &str) -> bool {
    let line = line.trim_start();
    FORWARD_HEADER_FIELDS
        .iter()
        .any(|field| line.starts_with(field))
}

fn cut_before(lines: &[&str], index: usize) -> String {
    let mut kept = &lines[..index];
    // Only the blank line introducing the boundary is trimmed.
    if let Some((last, rest)) = kept.split_last()
        && last.trim().is_empty()
    {
        kept = rest;
    }
    if kept.iter().all(|line| line.trim().is_empty()) {
        return String::new();
    }
    let mut out = kept.join("\n");
    out.push('\n');
    out
}

fn keep_forward_header(lines: &[&str], delimiter: usize) -> String {
    let mut end = delimiter + 1;
    while end < lines.len() && is_forward_header_field(lines[end]) {
        end += 1;
    }
    let mut out = lines[..end].join("\n");
    out.push('\n');
    out
}
