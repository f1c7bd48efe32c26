//! Compose-side quoting for replies and forwards.
//!
//! The inverse of boundary detection: building the quoted block and
//! attribution header when the user replies, and the delimiter/header
//! block when forwarding. What this module generates, the detector in this
//! crate recognizes, so rendered threads stay non-duplicating.

use chrono::{DateTime, TimeZone};

/// Prefixes every line of a body with a quote marker.
///
/// Already-quoted lines gain one more level of depth; blank lines become a
/// bare `>` so the quoted block stays contiguous.
#[must_use]
pub fn quote(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the English attribution header for a reply.
#[must_use]
pub fn attribution<Tz: TimeZone>(sent_at: &DateTime<Tz>, sender: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "On {} at {} {sender} wrote:",
        sent_at.format("%a, %b %-d, %Y"),
        sent_at.format("%-I:%M %p"),
    )
}

/// Builds the forwarded-message delimiter and identifying header block.
#[must_use]
pub fn forward_header(from: &str, date: &str, subject: &str, to: &str) -> String {
    format!(
        "---------- Forwarded message ---------\n\
         From: {from}\n\
         Date: {date}\n\
         Subject: {subject}\n\
         To: {to}\n"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_quote_prefixes_lines() {
        assert_eq!(quote("a\nb"), "> a\n> b");
        assert_eq!(quote("a\n\nb"), "> a\n>\n> b");
    }

    #[test]
    fn test_quote_deepens_existing_quotes() {
        assert_eq!(quote("reply\n> older"), "> reply\n> > older");
    }

    #[test]
    fn test_quote_empty() {
        assert_eq!(quote(""), "");
    }

    #[test]
    fn test_attribution_format() {
        let sent = Utc.with_ymd_and_hms(2026, 2, 10, 10, 30, 0).unwrap();
        assert_eq!(
            attribution(&sent, "John <john@example.com>"),
            "On Tue, Feb 10, 2026 at 10:30 AM John <john@example.com> wrote:"
        );
    }

    #[test]
    fn test_attribution_afternoon() {
        let sent = Utc.with_ymd_and_hms(2026, 2, 10, 15, 5, 0).unwrap();
        assert_eq!(
            attribution(&sent, "Ana"),
            "On Tue, Feb 10, 2026 at 3:05 PM Ana wrote:"
        );
    }

    #[test]
    fn test_attribution_round_trips_through_matcher() {
        let sent = Utc.with_ymd_and_hms(2026, 2, 10, 10, 30, 0).unwrap();
        let header = attribution(&sent, "John <john@example.com>");
        let matched = crate::locale::match_attribution(&header).map(|m| m.locale);
        assert_eq!(matched, Some("en"));
    }

    #[test]
    fn test_forward_header_round_trips_through_detector() {
        let header = forward_header(
            "Ana <ana@example.com>",
            "Mon, Feb 9, 2026",
            "Quarterly numbers",
            "Bob <bob@example.com>",
        );
        let message = format!("See below.\n\n{header}\nforwarded body text");
        let visible = crate::visible_reply(&message);
        assert!(visible.contains("From: Ana <ana@example.com>"));
        assert!(visible.contains("Subject: Quarterly numbers"));
        assert!(!visible.contains("forwarded body text"));
    }
}
