//! # mailscribe-reply
//!
//! Reply-boundary detection and compose-side quoting for the mailscribe
//! client.
//!
//! ## Features
//!
//! - **Boundary detection**: separates a message's new content from quoted
//!   history, forwarded bodies, and signatures
//! - **Locale matchers**: attribution headers recognized for en, de, fr,
//!   zh, ja, ko — independent matchers tried in a fixed order
//! - **Compose quoting**: quote blocks, attribution headers, and forward
//!   header blocks for the reply/forward path
//!
//! Boundary detection is intentionally lossy and exists only for compact
//! interactive display, so quoted history already visible in an earlier
//! message of the same thread is not repeated. The forward/send path uses
//! the renderer's output directly and must never pass through it.
//!
//! ## Quick Start
//!
//! ```
//! use mailscribe_reply::visible_reply;
//!
//! let text = "Thanks!\n\nOn Mon, Feb 10, 2026 at 10:30 AM John <john@example.com> wrote:\n> Original message here.";
//! assert_eq!(visible_reply(text), "Thanks!\n");
//! ```
//!
//! Like rendering, detection is total: any string input is valid and the
//! empty input yields the empty string.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod boundary;
pub mod locale;
mod quote;

pub use boundary::visible_reply;
pub use locale::{ATTRIBUTION_MATCHERS, LocaleMatcher, match_attribution};
pub use quote::{attribution, forward_header, quote};
