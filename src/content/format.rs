//! Header/body split for email-shaped replies

use regex::Regex;
use std::sync::OnceLock;

/// One `name: value` line from the header block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Field name exactly as written (case preserved)
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Header block plus everything after it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailContent {
    pub headers: Vec<HeaderField>,
    pub body: String,
}

fn re_header_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(to|from|cc|bcc|subject|date):").expect("header line pattern is valid")
    })
}

/// Split email-shaped text into its leading headers and the remaining body.
///
/// The header block ends at the first blank line (which is dropped) or at the
/// first line that is not header-shaped (which starts the body). Body lines are
/// kept verbatim, including blank and trailing ones.
pub fn format_email(content: &str) -> EmailContent {
    let mut headers = Vec::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_header = true;

    for line in content.split('\n') {
        if !in_header {
            body_lines.push(line);
            continue;
        }

        if line.trim().is_empty() {
            in_header = false;
        } else if re_header_line().is_match(line) {
            headers.push(split_header(line));
        } else {
            in_header = false;
            body_lines.push(line);
        }
    }

    EmailContent {
        headers,
        body: body_lines.join("\n"),
    }
}

/// Split on the first `:` and any whitespace right after it
fn split_header(line: &str) -> HeaderField {
    match line.split_once(':') {
        Some((name, rest)) => HeaderField::new(name, rest.trim_start()),
        None => HeaderField::new(line, ""),
    }
}
