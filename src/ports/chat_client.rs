//! Chat client port: Trait for the hosted text-generation endpoint.

/// Errors from a completion request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("API key is not configured (set {0})")]
    MissingApiKey(&'static str),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response contained no text")]
    EmptyResponse,
}

/// Sends a system instruction plus one user prompt and returns the
/// generated text.
///
/// Implementors encapsulate transport, serialization and vendor-specific
/// API details.
pub trait ChatClient: Send + Sync {
    /// # Errors
    /// Returns `ChatError` on any transport, status or decoding failure.
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ChatError>;
}
