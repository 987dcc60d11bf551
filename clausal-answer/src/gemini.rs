//! Gemini API client implementing the [`TextGenerator`] capability.

use crate::error::{AnswerError, Result};
use crate::generator::{GeneratedText, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model, matching the decision assistant's deployment.
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-pro";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Text-in/text-out client for the Gemini `generateContent` endpoint.
///
/// Authentication uses the `x-goog-api-key` header. Absence of the credential
/// is a clean functional failure: [`GeminiClient::from_env`] returns `None`
/// and callers fall back to their error-shaped results.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub(crate) content: Option<CandidateContent>,
    pub(crate) safety_ratings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidatePart {
    #[serde(default)]
    pub(crate) text: String,
}

impl GenerationResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        Some(
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<Vec<_>>()
                .concat(),
        )
    }
}

/// One entry from the model listing endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

// ── Client ──────────────────────────────────────────────────────────

impl GeminiClient {
    /// Create a client with an explicit API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client from the `GOOGLE_API_KEY` environment variable, or
    /// `None` when the credential is absent or empty.
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(key)),
            _ => {
                tracing::warn!("{API_KEY_ENV} is not set; LLM-backed operations will be unavailable");
                None
            }
        }
    }

    /// Use a different generation model (e.g. `models/gemini-2.5-flash`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The model this client generates with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// List the models available to this credential.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|source| AnswerError::Http {
                source,
                url: url.clone(),
            })?;

        let response = check_response(response).await?;
        let listing: ListModelsResponse = response
            .json()
            .await
            .map_err(|source| AnswerError::Decode { source })?;
        Ok(listing.models)
    }
}

/// Check the response status code and return an error if it is not successful.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let description = response.text().await.ok();
        return Err(AnswerError::BadResponse {
            code: status.as_u16(),
            description,
        });
    }
    Ok(response)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!("Generating with {} ({} prompt chars)", self.model, prompt.len());
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| AnswerError::Http {
                source,
                url: url.clone(),
            })?;

        let response = check_response(response).await?;
        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|source| AnswerError::Decode { source })?;

        let text = generation.text().ok_or(AnswerError::EmptyResponse)?;
        let safety_ratings = generation
            .candidates
            .first()
            .and_then(|candidate| candidate.safety_ratings.clone());

        Ok(GeneratedText {
            text: text.trim().to_string(),
            safety_ratings,
        })
    }
}
