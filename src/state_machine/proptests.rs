//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::api::{TransportError, UploadError};
use crate::conversation::{Conversation, Role};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_document() -> impl Strategy<Value = Document> {
    ("[a-z]{1,8}\\.(txt|pdf|docx)", proptest::collection::vec(any::<u8>(), 0..32))
        .prop_map(|(name, bytes)| Document::new(name, "application/octet-stream", bytes))
}

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ?]{1,30}".prop_filter("non-blank", |s| !s.trim().is_empty()),
        arb_blank_text(),
    ]
}

fn arb_transport_error() -> impl Strategy<Value = TransportError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(TransportError::network),
        (400u16..600, "[a-z ]{1,20}").prop_map(|(code, m)| TransportError::status(code, m)),
        "[a-z ]{1,20}".prop_map(TransportError::decode),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::SubmitText { text }),
        arb_document().prop_map(|document| Event::SelectFile { document }),
        Just(Event::SubmitFile),
        "[a-zA-Z ]{0,30}".prop_map(|response| Event::ReplyReceived { response }),
        arb_transport_error().prop_map(|error| Event::ReplyFailed { error }),
        ("[a-zA-Z ]{0,30}", "[a-zA-Z ]{0,30}").prop_map(|(extracted_text, ai_response)| {
            Event::UploadComplete {
                extracted_text,
                ai_response,
            }
        }),
        arb_transport_error().prop_map(|error| Event::UploadFailed {
            error: UploadError::from(error)
        }),
    ]
}

fn arb_state() -> impl Strategy<Value = ChatState> {
    (
        prop_oneof![
            Just(TurnState::Idle),
            Just(TurnState::AwaitingReply),
            Just(TurnState::AwaitingUpload),
        ],
        proptest::option::of(arb_document()),
    )
        .prop_map(|(turn, selected_file)| ChatState {
            turn,
            selected_file,
        })
}

// ============================================================================
// Helpers
// ============================================================================

/// Apply the append effects the way the runtime does
fn apply_appends(conversation: &Conversation, effects: &[Effect]) -> Conversation {
    effects.iter().fold(conversation.clone(), |conv, effect| match effect {
        Effect::AppendTurns { turns } => conv.append_all(turns.clone()),
        _ => conv,
    })
}

fn append_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::AppendTurns { .. }))
        .count()
}

fn effects_are_valid(effects: &[Effect], new_state: &ChatState) -> bool {
    let requests_reply = effects.iter().any(|e| matches!(e, Effect::RequestReply));
    let uploads = effects.iter().any(|e| matches!(e, Effect::Upload { .. }));

    if requests_reply && new_state.turn != TurnState::AwaitingReply {
        return false;
    }
    if uploads && new_state.turn != TurnState::AwaitingUpload {
        return false;
    }

    // The user's turn must be in the history before the assistant is called
    if let Some(request_at) = effects.iter().position(|e| matches!(e, Effect::RequestReply)) {
        let appended_before = effects
            .iter()
            .take(request_at)
            .any(|e| matches!(e, Effect::AppendTurns { .. }));
        if !appended_before {
            return false;
        }
    }

    true
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Effects are consistent with the state they lead to
    #[test]
    fn prop_transitions_produce_valid_effects(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ChatState::default();

        for event in events {
            if let Ok(result) = transition(&state, event) {
                prop_assert!(
                    effects_are_valid(&result.effects, &result.new_state),
                    "Invalid effects for state {:?}: {:?}",
                    result.new_state,
                    result.effects
                );
                state = result.new_state;
            }
        }
    }

    // The conversation only grows, never shrinks, and turns are only appended
    #[test]
    fn prop_conversation_is_append_only(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ChatState::default();
        let mut conversation = Conversation::seed();

        for event in events {
            if let Ok(result) = transition(&state, event) {
                let next = apply_appends(&conversation, &result.effects);
                prop_assert!(next.len() >= conversation.len());
                prop_assert_eq!(&next.history()[..conversation.len()], conversation.history());
                conversation = next;
                state = result.new_state;
            }
        }
        prop_assert!(conversation.len() >= 1);
    }

    // Blank input never changes anything
    #[test]
    fn prop_blank_input_is_noop(state in arb_state(), text in arb_blank_text()) {
        let result = transition(&state, Event::SubmitText { text });
        prop_assert!(result.is_err());
    }

    // No new round trip can start while one is in flight
    #[test]
    fn prop_busy_rejects_user_actions(
        state in arb_state(),
        text in "[a-z]{1,10}",
        document in arb_document(),
    ) {
        prop_assume!(state.turn.is_busy());
        for event in [
            Event::SubmitText { text },
            Event::SubmitFile,
            Event::SelectFile { document },
        ] {
            prop_assert_eq!(transition(&state, event).unwrap_err(), TransitionError::Busy);
        }
    }

    // Upload success appends exactly the user/assistant pair in one update
    #[test]
    fn prop_upload_success_appends_pair(
        document in arb_document(),
        extracted_text in "[a-zA-Z ]{0,30}",
        ai_response in "[a-zA-Z ]{0,30}",
    ) {
        let state = ChatState { turn: TurnState::AwaitingUpload, selected_file: Some(document) };
        let result = transition(&state, Event::UploadComplete { extracted_text, ai_response }).unwrap();

        prop_assert_eq!(append_count(&result.effects), 1);
        let conversation = apply_appends(&Conversation::seed(), &result.effects);
        prop_assert_eq!(conversation.len(), 3);
        prop_assert_eq!(conversation.history()[1].role, Role::User);
        prop_assert_eq!(conversation.history()[2].role, Role::Assistant);
    }

    // Upload failure appends nothing and keeps the selection
    #[test]
    fn prop_upload_failure_appends_nothing(
        document in arb_document(),
        error in arb_transport_error(),
    ) {
        let state = ChatState { turn: TurnState::AwaitingUpload, selected_file: Some(document.clone()) };
        let result = transition(&state, Event::UploadFailed { error: error.into() }).unwrap();

        prop_assert_eq!(append_count(&result.effects), 0);
        prop_assert_eq!(result.new_state.selected_file, Some(document));
        prop_assert_eq!(result.new_state.turn, TurnState::Idle);
    }

    // Any assistant failure becomes exactly one apology turn
    #[test]
    fn prop_reply_failure_appends_apology(error in arb_transport_error()) {
        let state = ChatState { turn: TurnState::AwaitingReply, selected_file: None };
        let result = transition(&state, Event::ReplyFailed { error }).unwrap();

        let conversation = apply_appends(&Conversation::seed(), &result.effects);
        prop_assert_eq!(conversation.len(), 2);
        prop_assert_eq!(conversation.last().role, Role::Assistant);
        prop_assert_eq!(conversation.last().content.as_str(), APOLOGY);
    }

    // Every accepted submission eventually returns to Idle on the matching reply
    #[test]
    fn prop_idle_after_round_trip(text in "[a-zA-Z]{1,20}", response in "[a-zA-Z ]{0,20}", fail in any::<bool>()) {
        let sent = transition(&ChatState::default(), Event::SubmitText { text }).unwrap();
        prop_assert_eq!(sent.new_state.turn, TurnState::AwaitingReply);

        let event = if fail {
            Event::ReplyFailed { error: TransportError::network("down") }
        } else {
            Event::ReplyReceived { response }
        };
        let done = transition(&sent.new_state, event).unwrap();
        prop_assert_eq!(done.new_state.turn, TurnState::Idle);
        prop_assert!(done.effects.contains(&Effect::TurnDone));
    }
}
