//! Pure state transition function
//!
//! Given the same state and event this always produces the same result and
//! performs no I/O. The runtime executes the returned effects in order.

use super::{ChatState, Effect, Event, TurnState};
use crate::conversation::Turn;
use thiserror::Error;

/// Assistant turn appended when the assistant call fails
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Alert raised when an upload fails
pub const UPLOAD_ALERT: &str = "Failed to upload file. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why an event was not accepted. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Nothing to send")]
    EmptyInput,
    #[error("No file selected")]
    NoFileSelected,
    #[error("Still waiting for the previous reply")]
    Busy,
    #[error("Invalid transition: {event} in state {state}")]
    InvalidTransition {
        event: &'static str,
        state: &'static str,
    },
}

pub fn transition(state: &ChatState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state.turn, event) {
        // ============================================================
        // User input
        // ============================================================

        // Busy + any user action -> reject, nothing is queued
        (turn, Event::SubmitText { .. } | Event::SubmitFile | Event::SelectFile { .. })
            if turn.is_busy() =>
        {
            Err(TransitionError::Busy)
        }

        (TurnState::Idle, Event::SubmitText { text }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyInput)
        }

        // Idle + SubmitText -> AwaitingReply, user turn appended before the call
        (TurnState::Idle, Event::SubmitText { text }) => Ok(TransitionResult::new(
            state.with_turn(TurnState::AwaitingReply),
        )
        .with_effect(Effect::append(Turn::user(text)))
        .with_effect(Effect::ClearInput)
        .with_effect(Effect::NotifyState)
        .with_effect(Effect::RequestReply)),

        (TurnState::Idle, Event::SelectFile { document }) => Ok(TransitionResult::new(ChatState {
            turn: TurnState::Idle,
            selected_file: Some(document),
        })
        .with_effect(Effect::NotifySelection)),

        (TurnState::Idle, Event::SubmitFile) => {
            let Some(document) = state.selected_file.clone() else {
                return Err(TransitionError::NoFileSelected);
            };
            Ok(
                TransitionResult::new(state.with_turn(TurnState::AwaitingUpload))
                    .with_effect(Effect::NotifyState)
                    .with_effect(Effect::Upload { document }),
            )
        }

        // ============================================================
        // Assistant replies
        // ============================================================
        (TurnState::AwaitingReply, Event::ReplyReceived { response }) => Ok(
            TransitionResult::new(state.with_turn(TurnState::Idle))
                .with_effect(Effect::append(Turn::assistant(response)))
                .with_effect(Effect::NotifyState)
                .with_effect(Effect::TurnDone),
        ),

        // The error detail is logged by the caller, never shown in the transcript
        (TurnState::AwaitingReply, Event::ReplyFailed { .. }) => Ok(TransitionResult::new(
            state.with_turn(TurnState::Idle),
        )
        .with_effect(Effect::append(Turn::assistant(APOLOGY)))
        .with_effect(Effect::NotifyState)
        .with_effect(Effect::TurnDone)),

        // ============================================================
        // Uploads
        // ============================================================

        // Both turns go in one effect so no observer sees only the user turn
        (
            TurnState::AwaitingUpload,
            Event::UploadComplete {
                extracted_text,
                ai_response,
            },
        ) => Ok(TransitionResult::new(ChatState::default())
            .with_effect(Effect::AppendTurns {
                turns: vec![Turn::user(extracted_text), Turn::assistant(ai_response)],
            })
            .with_effect(Effect::NotifySelection)
            .with_effect(Effect::NotifyState)
            .with_effect(Effect::TurnDone)),

        // Conversation untouched, selection kept for a retry
        (TurnState::AwaitingUpload, Event::UploadFailed { .. }) => Ok(TransitionResult::new(
            state.with_turn(TurnState::Idle),
        )
        .with_effect(Effect::alert(UPLOAD_ALERT))
        .with_effect(Effect::NotifyState)
        .with_effect(Effect::TurnDone)),

        // Replies that do not belong to the current state
        (turn, event) => Err(TransitionError::InvalidTransition {
            event: event.name(),
            state: turn.name(),
        }),
    }
}
