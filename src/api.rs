//! Chatbot backend collaborators
//!
//! The runtime only sees the `AssistantClient` and `UploadClient` traits;
//! this module provides the HTTP implementation and a logging wrapper.

mod error;
mod http;
mod types;

pub use error::{ErrorKind, TransportError, UploadError};
pub use http::HttpBackend;
pub use types::{ChatReply, UploadReply};

use crate::conversation::Turn;
use crate::runtime::{AssistantClient, UploadClient};
use crate::state_machine::Document;
use async_trait::async_trait;
use std::time::Instant;

/// Logging wrapper for backend collaborators
pub struct LoggingBackend<B> {
    inner: B,
}

impl<B> LoggingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: AssistantClient> AssistantClient for LoggingBackend<B> {
    async fn send_turn(&self, history: &[Turn]) -> Result<ChatReply, TransportError> {
        let start = Instant::now();
        let result = self.inner.send_turn(history).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    turns = history.len(),
                    reply_chars = reply.response.chars().count(),
                    "Assistant request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    turns = history.len(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Assistant request failed"
                );
            }
        }

        result
    }
}

#[async_trait]
impl<B: UploadClient> UploadClient for LoggingBackend<B> {
    async fn upload_and_respond(
        &self,
        document: &Document,
        history: &[Turn],
    ) -> Result<UploadReply, UploadError> {
        let start = Instant::now();
        let result = self.inner.upload_and_respond(document, history).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    file = %document.file_name,
                    bytes = document.bytes.len(),
                    extracted_chars = reply.extracted_text.chars().count(),
                    "Upload completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    file = %document.file_name,
                    kind = ?e.kind,
                    error = %e.message,
                    "Upload failed"
                );
            }
        }

        result
    }
}
