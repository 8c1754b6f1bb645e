//! Assistant DTOs for the chat round-trip and event confirmation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ChatMessage, ExtractedEventData};

/// Request body for `POST /assistant/chat`: the whole conversation so far,
/// oldest turn first.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Conversation turns.
    pub messages: Vec<ChatMessage>,
}

/// Response body for `POST /assistant/chat`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Conversational reply to show the user.
    pub reply: String,
    /// Fields extracted so far; every field may be absent.
    pub partial_event: ExtractedEventData,
    /// `true` when name, sport or start time has been extracted.
    pub has_event_details: bool,
}

/// Request body for `POST /assistant/events`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmEventRequest {
    /// The extracted record the user confirmed.
    pub event: ExtractedEventData,
}
