//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::api::{ChatReply, TransportError, UploadError, UploadReply};
use crate::conversation::Turn;
use crate::state_machine::Document;
use async_trait::async_trait;
use std::sync::Arc;

/// The remote assistant
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send the full history and get the assistant's reply
    async fn send_turn(&self, history: &[Turn]) -> Result<ChatReply, TransportError>;
}

/// The upload/extraction service
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Upload a document; the service extracts its text and replies to it
    async fn upload_and_respond(
        &self,
        document: &Document,
        history: &[Turn],
    ) -> Result<UploadReply, UploadError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: AssistantClient + ?Sized> AssistantClient for Arc<T> {
    async fn send_turn(&self, history: &[Turn]) -> Result<ChatReply, TransportError> {
        (**self).send_turn(history).await
    }
}

#[async_trait]
impl<T: UploadClient + ?Sized> UploadClient for Arc<T> {
    async fn upload_and_respond(
        &self,
        document: &Document,
        history: &[Turn],
    ) -> Result<UploadReply, UploadError> {
        (**self).upload_and_respond(document, history).await
    }
}
