//! Gemini adapter: Implementation of `ChatClient` over the
//! `generateContent` REST endpoint.
//!
//! One blocking request per prompt. The API key travels in the
//! `x-goog-api-key` header, never in the URL, so transport errors that echo
//! the URL cannot leak it.

use serde::{Deserialize, Serialize};

use crate::ports::{ChatClient, ChatError};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<RequestContent<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system: &'a str, prompt: &'a str) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: vec![TextPart { text: system }],
            },
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Pull the reply text out of a `generateContent` response body.
fn extract_text(body: &str) -> Result<String, ChatError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ChatError::Blocked(reason));
        }
        return Err(ChatError::MalformedResponse("no candidates".into()));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        return if matches!(
            reason.as_str(),
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT"
        ) {
            Err(ChatError::Blocked(reason))
        } else {
            Err(ChatError::EmptyResponse)
        };
    }
    Ok(text)
}

/// Blocking Gemini client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// `endpoint` is the API origin, e.g. `https://generativelanguage.googleapis.com`.
    #[must_use]
    pub fn new(endpoint: &str, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

// The API key must never appear in logs.
impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ChatClient for GeminiClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ChatError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ChatError::MissingApiKey(API_KEY_ENV))?;

        tracing::debug!(model = %self.model, "sending generateContent request");
        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::new(system, prompt))
            .send()
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ChatError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = extract_text(&body)?;
        tracing::debug!(chars = text.chars().count(), "received generateContent reply");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::new("persona", "hello"))
            .expect("serialize request");
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "persona");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["contents"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "doctor."}]},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(extract_text(body).expect("text"), "Hello, doctor.");
    }

    #[test]
    fn test_extract_text_errors() {
        assert!(matches!(
            extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
            Err(ChatError::Blocked(reason)) if reason == "SAFETY"
        ));
        assert!(matches!(
            extract_text(r#"{"candidates": []}"#),
            Err(ChatError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_text(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#),
            Err(ChatError::Blocked(_))
        ));
        assert!(matches!(
            extract_text(r#"{"candidates": [{"content": {"parts": []}, "finishReason": "STOP"}]}"#),
            Err(ChatError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text("<html>"),
            Err(ChatError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, Some("  ".into()));
        assert!(!client.has_api_key());
        assert_eq!(
            client.complete("persona", "hi"),
            Err(ChatError::MissingApiKey(API_KEY_ENV))
        );
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        // Port 9 (discard) is not listening on loopback in test environments.
        let client = GeminiClient::new("http://127.0.0.1:9/", "m", Some("k".into()));
        assert_eq!(client.url(), "http://127.0.0.1:9/v1beta/models/m:generateContent");
        assert!(client.complete("persona", "hi").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, Some("AIzaSecret".into()));
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("AIzaSecret"));
        assert!(dbg.contains("<redacted>"));
    }
}
