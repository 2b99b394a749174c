//! Events that drive the orchestrator

use super::state::Document;
use crate::api::{TransportError, UploadError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    SubmitText {
        text: String,
    },
    SelectFile {
        document: Document,
    },
    SubmitFile,

    // Assistant events
    ReplyReceived {
        response: String,
    },
    ReplyFailed {
        error: TransportError,
    },

    // Upload events
    UploadComplete {
        extracted_text: String,
        ai_response: String,
    },
    UploadFailed {
        error: UploadError,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SubmitText { .. } => "submit_text",
            Event::SelectFile { .. } => "select_file",
            Event::SubmitFile => "submit_file",
            Event::ReplyReceived { .. } => "reply_received",
            Event::ReplyFailed { .. } => "reply_failed",
            Event::UploadComplete { .. } => "upload_complete",
            Event::UploadFailed { .. } => "upload_failed",
        }
    }
}
