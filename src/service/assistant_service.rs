//! Assistant service: one extraction round-trip per chat request, and
//! confirmation of an extracted event through the regular creation path.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::EventService;
use crate::ai::{Extraction, GeminiClient, parse_model_output, prompt::build_prompt};
use crate::domain::{ChatMessage, Event, ExtractedEventData, ReferenceDates, UserId};
use crate::error::AppError;

/// Drives the event-extraction conversation.
#[derive(Debug, Clone)]
pub struct AssistantService {
    client: GeminiClient,
    events: Arc<EventService>,
}

impl AssistantService {
    /// Creates a new `AssistantService`.
    #[must_use]
    pub fn new(client: GeminiClient, events: Arc<EventService>) -> Self {
        Self { client, events }
    }

    /// Sends the conversation to the model and parses its reply.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for an empty conversation and
    /// [`AppError::Assistant`] when the model call fails. A malformed JSON
    /// block is not an error.
    pub async fn chat(&self, history: &[ChatMessage], now: DateTime<Utc>) -> Result<Extraction, AppError> {
        if history.is_empty() {
            return Err(AppError::InvalidRequest(
                "At least one message is required".to_string(),
            ));
        }
        let dates = ReferenceDates::for_instant(now);
        let prompt = build_prompt(history, &dates);
        tracing::debug!(turns = history.len(), model = self.client.model(), "calling model");

        let output = self.client.generate(&prompt).await?;
        let extraction = parse_model_output(&output);
        tracing::info!(
            has_event = extraction.event_data.has_event_details(),
            "assistant reply parsed"
        );
        Ok(extraction)
    }

    /// Creates an event from a confirmed extraction.
    ///
    /// Missing venues default to a single "Main Venue"; the result then goes
    /// through the same validation as a manual submission.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] when name, sport or start time is
    /// missing, otherwise whatever [`EventService::create`] returns.
    pub async fn confirm(&self, user: UserId, data: ExtractedEventData) -> Result<Event, AppError> {
        let submission = data
            .into_submission()
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        self.events.create(user, &submission).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::ai::AiError;
    use crate::domain::ChatRole;
    use crate::persistence::EventStore;

    fn offline_service(api_key: Option<&str>) -> AssistantService {
        let Ok(pool) = PgPoolOptions::new().connect_lazy("postgres://offline@127.0.0.1:1/none") else {
            panic!("lazy pool should build without connecting");
        };
        let events = Arc::new(EventService::new(EventStore::new(pool)));
        let client = GeminiClient::new("http://127.0.0.1:1", "test-model", api_key.map(str::to_string));
        AssistantService::new(client, events)
    }

    #[tokio::test]
    async fn empty_history_is_rejected() {
        let result = offline_service(Some("k")).chat(&[], Utc::now()).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn unconfigured_model_fails_closed() {
        let history = [ChatMessage {
            role: ChatRole::User,
            content: "Basketball tomorrow at 3pm".to_string(),
        }];
        let result = offline_service(None).chat(&history, Utc::now()).await;
        assert!(matches!(result, Err(AppError::Assistant(AiError::NotConfigured))));
    }

    #[tokio::test]
    async fn confirm_requires_core_fields() {
        let data = ExtractedEventData {
            name: Some("Pickup Game".to_string()),
            ..ExtractedEventData::default()
        };
        let result = offline_service(None).confirm(UserId::new(), data).await;
        let Err(AppError::InvalidRequest(message)) = result else {
            panic!("expected invalid request, got {result:?}");
        };
        assert!(message.starts_with("Missing required fields"));
    }

    #[tokio::test]
    async fn confirm_runs_manual_validation() {
        let data = ExtractedEventData {
            name: Some("Pickup Game".to_string()),
            sport: Some("Basketball".to_string()),
            date_time: Some("next tuesday".to_string()),
            ..ExtractedEventData::default()
        };
        let result = offline_service(None).confirm(UserId::new(), data).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
