//! reqwest-backed implementation of the backend collaborators

use super::types::{ChatRequest, ErrorBody, HealthReply};
use super::{ChatReply, ErrorKind, TransportError, UploadError, UploadReply};
use crate::conversation::Turn;
use crate::runtime::{AssistantClient, UploadClient};
use crate::state_machine::Document;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the chatbot backend (`/chat`, `/upload`, `/health`)
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`
    pub async fn health(&self) -> Result<HealthReply, TransportError> {
        let response = self.client.get(self.endpoint("health")).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl AssistantClient for HttpBackend {
    async fn send_turn(&self, history: &[Turn]) -> Result<ChatReply, TransportError> {
        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(&ChatRequest {
                conversation_history: history,
            })
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl UploadClient for HttpBackend {
    async fn upload_and_respond(
        &self,
        document: &Document,
        history: &[Turn],
    ) -> Result<UploadReply, UploadError> {
        let history_json = serde_json::to_string(history).map_err(|e| {
            UploadError::new(ErrorKind::Decode, format!("Failed to encode history: {e}"))
        })?;

        let part = Part::bytes(document.bytes.to_vec())
            .file_name(document.file_name.clone())
            .mime_str(&document.media_type)
            .map_err(|e| {
                UploadError::new(
                    ErrorKind::Decode,
                    format!("Invalid media type {}: {e}", document.media_type),
                )
            })?;

        let form = Form::new()
            .part("file", part)
            .text("conversation_history", history_json);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        Ok(read_json(response).await?)
    }
}

/// Decode a success body, or turn a non-2xx status into an error
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_error(status, &body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::decode(format!("Malformed response body: {e}")))
}

fn classify_error(status: StatusCode, body: &str) -> TransportError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());

    let message = if detail.is_empty() {
        format!("Backend returned {status}")
    } else {
        format!("Backend returned {status}: {detail}")
    };
    TransportError::status(status.as_u16(), message)
}
