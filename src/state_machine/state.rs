//! Orchestrator state types

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Where the current round trip is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnState {
    /// Ready for input, nothing in flight
    #[default]
    Idle,

    /// User turn appended, assistant call in flight
    AwaitingReply,

    /// Document submitted, upload/extraction call in flight
    AwaitingUpload,
}

impl TurnState {
    /// A collaborator call is in flight; new submissions are refused
    pub fn is_busy(self) -> bool {
        !matches!(self, TurnState::Idle)
    }

    pub fn name(self) -> &'static str {
        match self {
            TurnState::Idle => "idle",
            TurnState::AwaitingReply => "awaiting_reply",
            TurnState::AwaitingUpload => "awaiting_upload",
        }
    }
}

/// A document picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl Document {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

// Keep file contents out of logs
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the transition function looks at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatState {
    pub turn: TurnState,
    /// Document chosen for the next upload; kept until an upload succeeds
    pub selected_file: Option<Document>,
}

impl ChatState {
    pub fn with_turn(&self, turn: TurnState) -> Self {
        Self {
            turn,
            selected_file: self.selected_file.clone(),
        }
    }
}

/// Per-conversation configuration
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub conversation_id: String,
}

impl ChatContext {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
        }
    }
}
