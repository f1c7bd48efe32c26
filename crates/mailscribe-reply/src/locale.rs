//! Locale-specific attribution header matchers.
//!
//! Quote introductions ("On <date>, <name> wrote:") are natural language
//! and differ per locale, so each supported locale gets its own named
//! matcher. The detector tries them in a fixed order and stops at the
//! first match; locales outside this list are a non-goal.

use regex::Regex;
use std::sync::LazyLock;

/// A named, locale-specific attribution pattern.
#[derive(Debug)]
pub struct LocaleMatcher {
    /// Short locale tag ("en", "de", ...).
    pub locale: &'static str,
    pattern: &'static LazyLock<Regex>,
}

impl LocaleMatcher {
    /// Returns true if the line is this locale's attribution header.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line.trim())
    }
}

// Bounded quantifiers keep matching linear on adversarial input.
static EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^On .{1,400} wrote:$").expect("EN: hardcoded regex is valid")
});
static DE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Am .{1,400} schrieb .{1,200}:$").expect("DE: hardcoded regex is valid")
});
static FR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Le .{1,400} a écrit ?:$").expect("FR: hardcoded regex is valid")
});
static ZH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^在.{1,400}写道[:：]$").expect("ZH: hardcoded regex is valid")
});
static JA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.{1,400}のメッセージ[:：]$").expect("JA: hardcoded regex is valid")
});
static KO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.{1,400} 작성[:：]$").expect("KO: hardcoded regex is valid")
});

/// Attribution matchers in evaluation order.
pub static ATTRIBUTION_MATCHERS: &[LocaleMatcher] = &[
    LocaleMatcher { locale: "en", pattern: &EN },
    LocaleMatcher { locale: "de", pattern: &DE },
    LocaleMatcher { locale: "fr", pattern: &FR },
    LocaleMatcher { locale: "zh", pattern: &ZH },
    LocaleMatcher { locale: "ja", pattern: &JA },
    LocaleMatcher { locale: "ko", pattern: &KO },
];

/// Finds the first matcher in evaluation order that recognizes the line.
#[must_use]
pub fn match_attribution(line: &str) -> Option<&'static LocaleMatcher> {
    ATTRIBUTION_MATCHERS.iter().find(|m| m.matches(line))
}
