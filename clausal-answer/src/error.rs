//! Error types for the LLM service boundary.

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, AnswerError>;

/// Failures while talking to the text-generation service.
///
/// These are internal to the crate's callers: the decision and explanation
/// entry points convert them into error-shaped result values rather than
/// letting them escape to the user.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// The HTTP request could not be performed.
    #[error("failed to perform request to '{url}': {source}")]
    Http {
        source: reqwest::Error,
        url: String,
    },

    /// The server answered with a non-success status code.
    #[error("bad response from server; code {code}; description: {}", description.as_deref().unwrap_or("none"))]
    BadResponse {
        code: u16,
        description: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {source}")]
    Decode { source: reqwest::Error },

    /// The model returned no usable candidates.
    #[error("model returned no candidates")]
    EmptyResponse,
}
