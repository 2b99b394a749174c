//! Assistant reply classification and formatting
//!
//! Replies that look like an email are split into a header block and a body;
//! everything else is shown as-is. Both steps are pure functions of the text.

mod classify;
mod format;


pub use classify::{classify, ContentKind};
pub use format::{format_email, EmailContent, HeaderField};

/// Classification result ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedContent {
    Plain,
    Email(EmailContent),
}

/// Classify `content` and, if it is email-shaped, split it into headers and body
pub fn classify_content(content: &str) -> ClassifiedContent {
    match classify(content) {
        ContentKind::Plain => ClassifiedContent::Plain,
        ContentKind::Email => ClassifiedContent::Email(format_email(content)),
    }
}
