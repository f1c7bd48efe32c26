//! One-line message previews for list display.

/// Builds a single-line preview of a rendered body.
///
/// Whitespace collapses to single spaces and Markdown block markers are
/// dropped from line starts. When the result exceeds `max_chars` it is
/// truncated on a character boundary and given a trailing ellipsis, so the
/// preview never splits a multi-byte character.
#[must_use]
pub fn snippet(text: &str, max_chars: usize) -> String {
    let mut words: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '>' | '#' | '*' | '-'));
        words.extend(line.split_whitespace());
    }
    let joined = words.join(" ");
    if joined.chars().count() <= max_chars {
        return joined;
    }
    let cut: String = joined.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
