//! The abstract text-generation capability.

use crate::error::Result;
use async_trait::async_trait;

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    /// The model's text output, trimmed.
    pub text: String,
    /// Provider-defined confidence/safety metadata, passed through opaquely.
    /// Its schema belongs to the provider and is not interpreted here.
    pub safety_ratings: Option<serde_json::Value>,
}

impl GeneratedText {
    /// A plain text result with no safety metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            safety_ratings: None,
        }
    }
}

/// "Generate text given a prompt."
///
/// The single seam between the local pipeline and the external LLM. Calls are
/// blocking from the caller's point of view: there is no retry or timeout
/// policy, and a failure surfaces immediately to be converted into an
/// error-shaped result by the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText>;
}
