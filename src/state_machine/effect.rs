//! Effects produced by state transitions

use super::state::Document;
use crate::conversation::Turn;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append turns to the conversation as one update
    AppendTurns { turns: Vec<Turn> },

    /// Empty the input buffer
    ClearInput,

    /// Send the current history to the assistant
    RequestReply,

    /// Upload a document with the current history
    Upload { document: Document },

    /// Tell observers the selected document changed
    NotifySelection,

    /// Show a transient message outside the transcript
    Alert { message: String },

    /// Tell observers the turn state changed
    NotifyState,

    /// Round trip finished, input accepted again
    TurnDone,
}

impl Effect {
    pub fn append(turn: Turn) -> Self {
        Effect::AppendTurns { turns: vec![turn] }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Effect::Alert {
            message: message.into(),
        }
    }
}
