//! Chat runtime executor

use super::traits::{AssistantClient, UploadClient};
use super::ChatEvent;
use crate::conversation::{Conversation, Turn};
use crate::state_machine::{
    transition, ChatContext, ChatState, Document, Effect, Event, TransitionError,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Conversation runtime, generic over the assistant and upload collaborators
pub struct ChatRuntime<A, U>
where
    A: AssistantClient + 'static,
    U: UploadClient + 'static,
{
    context: ChatContext,
    state: ChatState,
    /// Sole owner of the conversation; observers only get snapshots
    conversation: Conversation,
    assistant: Arc<A>,
    uploader: Arc<U>,
    /// User actions from the handles
    event_rx: mpsc::Receiver<Event>,
    /// Collaborator results, fed back by the spawned calls
    reply_tx: mpsc::Sender<Event>,
    reply_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<ChatEvent>,
}

impl<A, U> ChatRuntime<A, U>
where
    A: AssistantClient + 'static,
    U: UploadClient + 'static,
{
    pub fn new(
        context: ChatContext,
        conversation: Conversation,
        assistant: A,
        uploader: U,
        event_rx: mpsc::Receiver<Event>,
        broadcast_tx: broadcast::Sender<ChatEvent>,
    ) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel(8);
        Self {
            context,
            state: ChatState::default(),
            conversation,
            assistant: Arc::new(assistant),
            uploader: Arc::new(uploader),
            event_rx,
            reply_tx,
            reply_rx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(conversation_id = %self.context.conversation_id, "Starting chat runtime");

        // One event at a time, whichever channel it comes from
        let mut handles_open = true;
        loop {
            // Once every handle is gone, finish the round trip in flight
            if !handles_open && !self.state.turn.is_busy() {
                break;
            }

            let event = tokio::select! {
                Some(event) = self.reply_rx.recv() => event,
                event = self.event_rx.recv(), if handles_open => match event {
                    Some(event) => event,
                    None => {
                        handles_open = false;
                        continue;
                    }
                },
                else => break,
            };
            self.process_event(event);
        }

        tracing::info!(
            conversation_id = %self.context.conversation_id,
            turns = self.conversation.len(),
            "Chat runtime stopped"
        );
    }

    fn process_event(&mut self, event: Event) {
        let event_name = event.name();

        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(TransitionError::EmptyInput | TransitionError::NoFileSelected) => {
                tracing::debug!(event = event_name, "Ignoring event with nothing to do");
                return;
            }
            Err(e @ TransitionError::Busy) => {
                tracing::warn!(
                    conversation_id = %self.context.conversation_id,
                    event = event_name,
                    state = self.state.turn.name(),
                    "Rejected user action while busy"
                );
                let _ = self.broadcast_tx.send(ChatEvent::Rejected {
                    reason: e.to_string(),
                });
                return;
            }
            Err(e) => {
                tracing::warn!(conversation_id = %self.context.conversation_id, error = %e, "Dropping event");
                return;
            }
        };

        let old_turn = self.state.turn;
        self.state = result.new_state;
        tracing::debug!(
            event = event_name,
            from = old_turn.name(),
            to = self.state.turn.name(),
            "Transition"
        );

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendTurns { turns } => {
                let appended = turns.len();
                self.conversation = match <[Turn; 1]>::try_from(turns) {
                    Ok([turn]) => self.conversation.append(turn),
                    Err(turns) => self.conversation.append_all(turns),
                };
                tracing::debug!(
                    conversation_id = %self.context.conversation_id,
                    appended,
                    turns = self.conversation.len(),
                    "Turns appended"
                );
                let _ = self.broadcast_tx.send(ChatEvent::Transcript {
                    conversation: self.conversation.clone(),
                });
            }

            Effect::ClearInput => {
                let _ = self.broadcast_tx.send(ChatEvent::InputCleared);
            }

            Effect::RequestReply => self.request_reply(),

            Effect::Upload { document } => self.upload(document),

            Effect::NotifySelection => {
                let file_name = self
                    .state
                    .selected_file
                    .as_ref()
                    .map(|d| d.file_name.clone());
                let _ = self
                    .broadcast_tx
                    .send(ChatEvent::SelectionChanged { file_name });
            }

            Effect::Alert { message } => {
                let _ = self.broadcast_tx.send(ChatEvent::Alert { message });
            }

            Effect::NotifyState => {
                let _ = self.broadcast_tx.send(ChatEvent::StateChange {
                    state: self.state.turn,
                });
            }

            Effect::TurnDone => {
                let _ = self.broadcast_tx.send(ChatEvent::TurnDone);
            }
        }
    }

    /// Call the assistant in the background with the history as it is now
    fn request_reply(&self) {
        let reply_tx = self.reply_tx.clone();
        let history: Vec<Turn> = self.conversation.history().to_vec();
        let assistant = Arc::clone(&self.assistant);
        let conv_id = self.context.conversation_id.clone();

        tokio::spawn(async move {
            tracing::info!(conversation_id = %conv_id, turns = history.len(), "Requesting reply");
            let event = match assistant.send_turn(&history).await {
                Ok(reply) => Event::ReplyReceived {
                    response: reply.response,
                },
                Err(error) => {
                    tracing::warn!(conversation_id = %conv_id, error = %error, "Assistant call failed");
                    Event::ReplyFailed { error }
                }
            };
            let _ = reply_tx.send(event).await;
        });
    }

    /// Upload in the background with the history as it is now
    fn upload(&self, document: Document) {
        let reply_tx = self.reply_tx.clone();
        let history: Vec<Turn> = self.conversation.history().to_vec();
        let uploader = Arc::clone(&self.uploader);
        let conv_id = self.context.conversation_id.clone();

        tokio::spawn(async move {
            tracing::info!(
                conversation_id = %conv_id,
                file = %document.file_name,
                "Uploading document"
            );
            let event = match uploader.upload_and_respond(&document, &history).await {
                Ok(reply) => Event::UploadComplete {
                    extracted_text: reply.extracted_text,
                    ai_response: reply.ai_response,
                },
                Err(error) => {
                    tracing::warn!(conversation_id = %conv_id, error = %error, "Upload failed");
                    Event::UploadFailed { error }
                }
            };
            let _ = reply_tx.send(event).await;
        });
    }
}
