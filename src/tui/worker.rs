//! Background chat worker.
//!
//! The Gemini call blocks for as long as the HTTP round trip takes, so it
//! runs on its own thread and reports back over a channel that the TUI main
//! loop polls between frames.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::ChatRelay;
use crate::ports::ChatClient;

/// Messages from the chat worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatProgress {
    /// Request sent, waiting for the endpoint
    Sending,
    /// Reply text from the model
    Complete(String),
    /// Request failed; carries the localized fallback reply
    Failed(String),
}

/// Handle to a running chat request.
pub struct ChatWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<ChatProgress>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl ChatWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<ChatProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Runs one chat request in the background.
pub struct ChatWorker;

impl ChatWorker {
    /// Spawn a background request for `prompt`.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<C>(relay: Arc<ChatRelay<C>>, prompt: String) -> ChatWorkerHandle
    where
        C: ChatClient + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_request(&relay, &prompt, &tx);
        });

        ChatWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_request<C>(relay: &ChatRelay<C>, prompt: &str, tx: &Sender<ChatProgress>)
    where
        C: ChatClient,
    {
        let _ = tx.send(ChatProgress::Sending);

        let progress = match relay.relay(prompt) {
            Ok(reply) => ChatProgress::Complete(reply),
            Err(e) => ChatProgress::Failed(relay.fallback(&e)),
        };

        // The receiver is gone if the app quit mid-request.
        let _ = tx.send(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Locale;
    use crate::ports::ChatError;
    use std::time::Duration;

    struct Canned(Result<String, ChatError>);

    impl ChatClient for Canned {
        fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ChatError> {
            self.0.clone()
        }
    }

    fn collect(handle: &ChatWorkerHandle) -> Vec<ChatProgress> {
        let mut out = Vec::new();
        while let Ok(p) = handle.progress_rx.recv_timeout(Duration::from_secs(5)) {
            out.push(p);
        }
        out
    }

    #[test]
    fn test_worker_reports_reply() {
        let relay = Arc::new(ChatRelay::new(
            Arc::new(Canned(Ok("Take aspirin only if prescribed.".into()))),
            Locale::En,
        ));
        let handle = ChatWorker::spawn(relay, "question".into());

        assert_eq!(
            collect(&handle),
            vec![
                ChatProgress::Sending,
                ChatProgress::Complete("Take aspirin only if prescribed.".into())
            ]
        );
    }

    #[test]
    fn test_worker_reports_fallback_on_error() {
        let relay = Arc::new(ChatRelay::new(
            Arc::new(Canned(Err(ChatError::EmptyResponse))),
            Locale::Ru,
        ));
        let handle = ChatWorker::spawn(relay, "вопрос".into());

        let progress = collect(&handle);
        match progress.last() {
            Some(ChatProgress::Failed(text)) => {
                assert!(text.starts_with(Locale::Ru.text().chat_error));
            }
            other => panic!("unexpected progress: {other:?}"),
        }
    }
}
