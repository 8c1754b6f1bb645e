//! HTTP client for the hosted text-generation endpoint.

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::AiError;
use crate::config::AppConfig;

/// Client for `models/{model}:generateContent`.
///
/// Makes exactly one attempt per call. There is no retry and no timeout
/// beyond the HTTP client's defaults.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

impl GeminiClient {
    /// Creates a client. A `None` key makes every call fail with
    /// [`AiError::NotConfigured`].
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Creates a client from the `GEMINI_*` settings.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
        )
    }

    /// Returns `true` if an API key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Model name used for requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` and returns the trimmed text of the first candidate.
    ///
    /// # Errors
    ///
    /// - [`AiError::NotConfigured`] when no API key is set (no request is made).
    /// - [`AiError::ModelNotFound`] when the upstream reports the model or
    ///   endpoint as not found.
    /// - [`AiError::Upstream`] for transport failures and other non-success
    ///   responses.
    /// - [`AiError::EmptyResponse`] when the model produced no text.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AiError::NotConfigured);
        };

        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let url = Url::parse_with_params(&endpoint, &[("key", key)])
            .map_err(|err| AiError::Upstream(format!("invalid endpoint: {err}")))?;

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AiError::Upstream(err.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| AiError::Upstream(err.without_url().to_string()))?;

        if !status.is_success() {
            tracing::warn!(%status, model = %self.model, "generation request failed");
            return Err(classify_failure(status, text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|err| AiError::Upstream(format!("unreadable response: {err}")))?;

        parsed
            .first_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

fn classify_failure(status: StatusCode, body: String) -> AiError {
    if status == StatusCode::NOT_FOUND || body.contains("not found") || body.contains("404") {
        AiError::ModelNotFound(body)
    } else {
        AiError::Upstream(format!("Gemini API error: {body}"))
    }
}
