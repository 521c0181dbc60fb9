//! Chat relay: Forwards free-text prompts to the language model under the
//! cardiologist-assistant persona.
//!
//! Every prompt is independent; no history is sent upstream.

use std::sync::Arc;

use crate::domain::Locale;
use crate::ports::{ChatClient, ChatError};

/// Relays one prompt at a time to a `ChatClient`.
pub struct ChatRelay<C>
where
    C: ChatClient,
{
    client: Arc<C>,
    locale: Locale,
}

impl<C> ChatRelay<C>
where
    C: ChatClient,
{
    pub fn new(client: Arc<C>, locale: Locale) -> Self {
        Self { client, locale }
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Send `prompt` with the persona as system instruction.
    ///
    /// # Errors
    /// Returns the client's error unchanged.
    pub fn relay(&self, prompt: &str) -> Result<String, ChatError> {
        self.client.complete(self.locale.persona(), prompt)
    }

    /// Like [`ChatRelay::relay`], but never fails: errors become a
    /// displayable reply built from the localized error text.
    pub fn respond(&self, prompt: &str) -> String {
        self.relay(prompt).unwrap_or_else(|e| self.fallback(&e))
    }

    /// Localized assistant reply standing in for a failed request.
    pub fn fallback(&self, error: &ChatError) -> String {
        tracing::error!("Chat request failed: {}", error);
        format!("{}: {}", self.locale.text().chat_error, error)
    }
}
