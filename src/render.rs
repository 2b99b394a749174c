//! Terminal layout for conversation turns
//!
//! Rendering never changes what the classifier decided; it only lays it out.

use crate::content::{classify_content, ClassifiedContent, EmailContent, HeaderField};
use crate::conversation::{Role, Turn};
use crate::state_machine::TurnState;
use std::fmt::Write;

pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "AI Assistant";

/// Shown while a collaborator call is in flight
pub fn status_line(state: TurnState) -> Option<&'static str> {
    match state {
        TurnState::Idle => None,
        TurnState::AwaitingReply => Some("AI Assistant is thinking..."),
        TurnState::AwaitingUpload => Some("Analyzing document..."),
    }
}

/// Header name for display: first letter upper-cased, the rest unchanged
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_header(header: &HeaderField) -> String {
    format!("{}: {}", display_name(&header.name), header.value)
}

pub fn render_turn(turn: &Turn) -> String {
    match turn.role {
        Role::User => format!("{USER_LABEL}: {}", turn.content),
        Role::Assistant => match classify_content(&turn.content) {
            ClassifiedContent::Plain => format!("{ASSISTANT_LABEL}: {}", turn.content),
            ClassifiedContent::Email(email) => {
                format!("{ASSISTANT_LABEL}:\n{}", render_email(&email))
            }
        },
    }
}

fn render_email(email: &EmailContent) -> String {
    let mut out = String::new();
    for header in &email.headers {
        let _ = writeln!(out, "{}", render_header(header));
    }
    out.push('\n');
    out.push_str(&email.body);
    out
}
