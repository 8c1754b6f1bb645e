//! Event-extraction assistant: prompt, model client, and output parsing.
//!
//! One user turn is one round-trip: [`prompt::build_prompt`] renders the
//! conversation with reference dates, [`GeminiClient`] sends it, and
//! [`response::parse_model_output`] splits the reply from the extracted
//! event fields.

pub mod client;
pub mod prompt;
pub mod response;

pub use client::GeminiClient;
pub use response::{Extraction, parse_model_output};

/// Failures of the assistant round-trip.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key is configured.
    #[error("Gemini API key not configured")]
    NotConfigured,

    /// The upstream reported the model or endpoint as not found.
    #[error("Gemini API model not found: {0}")]
    ModelNotFound(String),

    /// Transport failure or any other non-success upstream response.
    #[error("{0}")]
    Upstream(String),

    /// The model answered without any text.
    #[error("No response generated")]
    EmptyResponse,
}

impl AiError {
    /// Explanation suitable for showing in the chat transcript.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => "I'm having trouble connecting to the AI service. Please check that the Gemini API key is configured in your environment variables.".to_string(),
            Self::ModelNotFound(_) => "I'm having trouble with the AI service configuration. Please check your Gemini API settings and model access.".to_string(),
            other => format!(
                "I encountered an error: {other}. Could you try rephrasing your request or providing more details about the sports event?"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_distinct() {
        let missing = AiError::NotConfigured.user_message();
        let model = AiError::ModelNotFound("x".into()).user_message();
        let empty = AiError::EmptyResponse.user_message();
        assert_ne!(missing, model);
        assert!(empty.contains("No response generated"));
    }
}
