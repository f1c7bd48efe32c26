//! HTML character reference decoding and whitespace normalization.
//!
//! Email bodies arrive with entity-encoded text (`&amp;`, `&#39;`) and some
//! senders pad words with zero-width characters to defeat preview matching.
//! [`normalize`] removes both so downstream display and matching see plain
//! UTF-8.

/// Zero-width and invisible formatting characters stripped by [`normalize`].
const ZERO_WIDTH: &[char] = &[
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{FEFF}', // zero width no-break space / BOM
    '\u{034F}', // combining grapheme joiner
];

/// Longest reference body the decoder will consider (between `&` and `;`).
const MAX_REFERENCE_LEN: usize = 32;

/// Named character references recognized by the decoder.
///
/// Deliberately a short list: the names that actually show up in email
/// bodies, not the full HTML5 table. Unknown names stay literal.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", " "), // regular space, not U+00A0
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("hellip", "\u{2026}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("laquo", "\u{00AB}"),
    ("raquo", "\u{00BB}"),
    ("bull", "\u{2022}"),
    ("middot", "\u{00B7}"),
    ("copy", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("trade", "\u{2122}"),
    ("deg", "\u{00B0}"),
    ("plusmn", "\u{00B1}"),
    ("times", "\u{00D7}"),
    ("divide", "\u{00F7}"),
    ("euro", "\u{20AC}"),
    ("pound", "\u{00A3}"),
    ("yen", "\u{00A5}"),
    ("cent", "\u{00A2}"),
    ("sect", "\u{00A7}"),
    ("para", "\u{00B6}"),
    ("eacute", "\u{00E9}"),
    ("egrave", "\u{00E8}"),
    ("agrave", "\u{00E0}"),
    ("auml", "\u{00E4}"),
    ("ouml", "\u{00F6}"),
    ("uuml", "\u{00FC}"),
    ("szlig", "\u{00DF}"),
    ("ccedil", "\u{00E7}"),
];

/// Names that also decode case-insensitively (`&AMP;` etc.).
const LEGACY_NAMES: &[&str] = &["amp", "lt", "gt", "quot", "nbsp"];

/// Decodes character references and strips zero-width characters.
///
/// Decoding repeats until a fixpoint so double-encoded references
/// (`&amp;nbsp;`) fully resolve; every successful decode strictly shrinks
/// the text, so the loop terminates. The fixpoint also makes the whole
/// operation idempotent.
///
/// Malformed references (missing terminator, unknown name) stay literal.
/// Numeric references that name an invalid or control code point decode to
/// U+FFFD so no `&#...;` form survives in the output.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut text = strip_zero_width(input);
    loop {
        let pass = strip_zero_width(&decode_entities(&text));
        if pass == text {
            return pass;
        }
        text = pass;
    }
}

/// Runs one decode pass over the input.
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    while let Some(rel) = input[pos..].find('&') {
        let start = pos + rel;
        out.push_str(&input[pos..start]);
        if let Some((decoded, consumed)) = decode_reference(&input[start..]) {
            out.push_str(&decoded);
            pos = start + consumed;
        } else {
            out.push('&');
            pos = start + 1;
        }
    }
    out.push_str(&input[pos..]);
    out
}

/// Decodes one reference at the start of `s` (which begins with `&`).
///
/// Returns the decoded text and the number of bytes consumed, or `None`
/// when `s` does not start with a well-formed reference.
fn decode_reference(s: &str) -> Option<(String, usize)> {
    let semi = s.find(';')?;
    if semi < 2 || semi > MAX_REFERENCE_LEN + 1 {
        return None;
    }
    let body = &s[1..semi];
    let consumed = semi + 1;

    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let ch = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(decode_code_point)
            .unwrap_or('\u{FFFD}');
        return Some((ch.to_string(), consumed));
    }
    if let Some(dec) = body.strip_prefix('#') {
        if dec.is_empty() || !dec.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let ch = dec
            .parse::<u32>()
            .ok()
            .and_then(decode_code_point)
            .unwrap_or('\u{FFFD}');
        return Some((ch.to_string(), consumed));
    }

    if let Some((_, value)) = NAMED_ENTITIES.iter().find(|(name, _)| *name == body) {
        return Some(((*value).to_string(), consumed));
    }
    // Legacy forms like &AMP; are valid HTML; only the short list gets the
    // case-insensitive treatment.
    let lower = body.to_ascii_lowercase();
    if LEGACY_NAMES.contains(&lower.as_str())
        && let Some((_, value)) = NAMED_ENTITIES.iter().find(|(name, _)| *name == lower)
    {
        return Some(((*value).to_string(), consumed));
    }
    None
}

/// Maps a numeric code point to a character, rejecting surrogates and
/// C0 controls other than tab and newline.
fn decode_code_point(code: u32) -> Option<char> {
    let ch = char::from_u32(code)?;
    if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
        return None;
    }
    Some(ch)
}

fn strip_zero_width(input: &str) -> String {
    input.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect()
}
