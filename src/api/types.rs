//! Wire types for the chatbot backend

use crate::conversation::Turn;
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub conversation_history: &'a [Turn],
}

/// Success body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Success body of `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
    pub extracted_text: String,
    pub ai_response: String,
}

/// Success body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReply {
    pub status: String,
}

/// Error body the backend sends with 4xx/5xx
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
