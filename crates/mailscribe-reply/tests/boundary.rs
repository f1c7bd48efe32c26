//! Integration tests for boundary detection over whole threads.

use chrono::TimeZone;
use mailscribe_reply::{attribution, quote, visible_reply};
use proptest::prelude::*;

#[test]
fn test_thread_does_not_repeat_quoted_history() {
    // Message 2 quotes message 1; trimming message 2 must drop exactly the
    // re-quoted material.
    let first = "Can you send the figures?";
    let second = format!(
        "Sure, attached.\n\nOn Mon, Feb 9, 2026 at 9:00 AM Ana <ana@example.com> wrote:\n{}",
        quote(first)
    );
    let visible = visible_reply(&second);
    assert_eq!(visible, "Sure, attached.\n");
    assert!(!visible.contains(first));
}

#[test]
fn test_compose_then_detect_round_trip() {
    let sent = chrono::Utc
        .with_ymd_and_hms(2026, 2, 9, 9, 0, 0)
        .unwrap();
    let reply = format!(
        "Looks good to me.\n\n{}\n{}",
        attribution(&sent, "Ana <ana@example.com>"),
        quote("Here is the draft.\n\nSecond paragraph.")
    );
    assert_eq!(visible_reply(&reply), "Looks good to me.\n");
}

#[test]
fn test_signature_and_quote_combined() {
    let text = "Done, merged.\n\n-- \nDev Team\n\n> old quoted line\n> another";
    assert_eq!(visible_reply(text), "Done, merged.\n");
}

#[test]
fn test_multilocale_threads() {
    for (line, reply) in [
        ("Am 09.02.2026 um 09:00 schrieb Ana:", "Passt, danke!"),
        ("Le 9 févr. 2026 à 09:00, Ana a écrit :", "Parfait, merci !"),
        ("在 2026年2月9日, Ana 写道：", "好的，谢谢！"),
    ] {
        let text = format!("{reply}\n\n{line}\n> alt");
        assert_eq!(visible_reply(&text), format!("{reply}\n"), "failed for {line}");
    }
}

proptest! {
    #[test]
    fn prop_never_panics(input in ".{0,400}") {
        let _ = visible_reply(&input);
    }

    #[test]
    fn prop_output_lines_are_a_prefix_of_input_lines(input in "(?s).{0,400}") {
        let output = visible_reply(&input);
        let out_lines: Vec<&str> = output.lines().collect();
        let in_lines: Vec<&str> = input.lines().collect();
        prop_assert!(out_lines.len() <= in_lines.len());
        prop_assert_eq!(&out_lines[..], &in_lines[..out_lines.len()]);
    }

    #[test]
    fn prop_quote_then_detect_is_empty(body in "[a-zA-Z0-9 .,!?]{0,200}") {
        // Quoting produces only quoted lines, so the detector sees no new
        // content at all.
        let quoted = quote(&body);
        if !quoted.is_empty() {
            prop_assert_eq!(visible_reply(&quoted), "");
        }
    }
}
