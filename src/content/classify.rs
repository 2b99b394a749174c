//! Email-shape heuristic
//!
//! A heuristic, not a validator. Any of the patterns below is enough.

use regex::Regex;
use std::sync::OnceLock;

/// Coarse tag for a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Plain,
    Email,
}

/// A `from:` followed by a `to:` on any later line
fn re_from_then_to() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)from:.*\n.*to:").expect("from/to pattern is valid"))
}

/// Any line starting with `subject:`
fn re_subject_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^subject:").expect("subject pattern is valid"))
}

/// First line opens with a well-known header name
fn re_leading_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\A[ \t]*(to|from|cc|subject|date):")
            .expect("leading header pattern is valid")
    })
}

pub fn classify(content: &str) -> ContentKind {
    let patterns = [re_from_then_to(), re_subject_line(), re_leading_header()];
    if patterns.iter().any(|re| re.is_match(content)) {
        ContentKind::Email
    } else {
        ContentKind::Plain
    }
}
