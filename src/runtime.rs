//! Runtime for executing the turn orchestrator
//!
//! One runtime task per conversation. It owns the conversation, feeds events
//! through the state machine one at a time, and broadcasts what changed.

mod executor;
pub mod traits;


pub use executor::ChatRuntime;
pub use traits::*;

use crate::conversation::Conversation;
use crate::state_machine::{ChatContext, Document, Event, TurnState};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Events sent to the rendering side
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// New conversation snapshot after an append
    Transcript { conversation: Conversation },
    StateChange { state: TurnState },
    InputCleared,
    SelectionChanged { file_name: Option<String> },
    Alert { message: String },
    /// A user action was refused (e.g. still waiting for a reply)
    Rejected { reason: String },
    TurnDone,
}

#[derive(Debug, Error)]
#[error("Conversation runtime has stopped")]
pub struct RuntimeClosed;

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ChatHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ChatEvent>,
}

impl ChatHandle {
    pub async fn send(&self, event: Event) -> Result<(), RuntimeClosed> {
        self.event_tx.send(event).await.map_err(|_| RuntimeClosed)
    }

    pub async fn submit_text(&self, text: impl Into<String>) -> Result<(), RuntimeClosed> {
        self.send(Event::SubmitText { text: text.into() }).await
    }

    pub async fn select_file(&self, document: Document) -> Result<(), RuntimeClosed> {
        self.send(Event::SelectFile { document }).await
    }

    pub async fn submit_file(&self) -> Result<(), RuntimeClosed> {
        self.send(Event::SubmitFile).await
    }

    /// Subscribe to conversation updates
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Start a runtime in the background.
///
/// The runtime stops once every `ChatHandle` is dropped and no reply or
/// upload is still outstanding.
pub fn start<A, U>(
    context: ChatContext,
    conversation: Conversation,
    assistant: A,
    uploader: U,
) -> (ChatHandle, JoinHandle<()>)
where
    A: AssistantClient + 'static,
    U: UploadClient + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);

    let runtime = ChatRuntime::new(
        context,
        conversation,
        assistant,
        uploader,
        event_rx,
        broadcast_tx.clone(),
    );

    let join = tokio::spawn(runtime.run());

    (
        ChatHandle {
            event_tx,
            broadcast_tx,
        },
        join,
    )
}
