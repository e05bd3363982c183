//! Conversation state and the request/response cycle that drives it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::api::{ChatBackend, ChatError, ChatRequest, ChatResponse};
use crate::core::constants::REQUEST_FAILED_MESSAGE;
use crate::core::conversation::ConversationLog;
use crate::core::message::MemoryInfo;
use crate::core::reveal::{RevealEngine, Sleeper};
use crate::core::sanitize::clean_memory_content;

/// Everything the chat screen shows, in one place.
#[derive(Debug, Default, Clone)]
pub struct ChatState {
    pub log: ConversationLog,
    /// Text in the input box that has not been sent yet.
    pub input: String,
    /// True from submission until the reply is fully revealed.
    pub loading: bool,
    /// Issued by the backend on the first reply; never generated locally.
    pub session_id: Option<String>,
    pub show_memory: bool,
}

impl ChatState {
    /// Adopt a backend-issued identity unless one is already set.
    fn adopt_session_id(&mut self, candidate: Option<&str>) {
        if self.session_id.is_none() {
            if let Some(id) = candidate.filter(|id| !id.is_empty()) {
                self.session_id = Some(id.to_string());
            }
        }
    }

    /// First eight characters of the session id, for the footer.
    pub fn short_session_id(&self) -> Option<String> {
        self.session_id
            .as_ref()
            .map(|id| id.chars().take(8).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty after trimming; nothing happened.
    Ignored,
    /// A previous submission is still in flight; nothing happened.
    Busy,
    /// The reply was revealed in full.
    Answered,
    /// The request failed and the error message was appended.
    Failed,
}

/// Owns the chat state and runs one request cycle per submission.
#[derive(Clone)]
pub struct ChatSession {
    state: Arc<Mutex<ChatState>>,
    backend: Arc<dyn ChatBackend>,
    reveal: Arc<RevealEngine>,
    shutdown: CancellationToken,
}

impl ChatSession {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        sleeper: Arc<dyn Sleeper>,
        reveal_delay: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState::default())),
            backend,
            reveal: Arc::new(RevealEngine::new(sleeper, reveal_delay)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> Arc<Mutex<ChatState>> {
        Arc::clone(&self.state)
    }

    pub async fn snapshot(&self) -> ChatState {
        self.state.lock().await.clone()
    }

    /// Abort any in-flight request; used when the client exits.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Send whatever is in the input box and clear it. Blank input is left
    /// untouched.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = {
            let mut guard = self.state.lock().await;
            if guard.loading {
                return SubmitOutcome::Busy;
            }
            if guard.input.trim().is_empty() {
                return SubmitOutcome::Ignored;
            }
            std::mem::take(&mut guard.input)
        };
        self.submit(&text).await
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.submit_with_progress(text, |_| {}).await
    }

    /// Run one full cycle: append the question and a typing placeholder,
    /// call the backend, then reveal the answer or append the error message.
    /// `on_char` observes each revealed character.
    pub async fn submit_with_progress<F>(&self, text: &str, on_char: F) -> SubmitOutcome
    where
        F: FnMut(char) + Send,
    {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let (typing_id, request) = {
            let mut guard = self.state.lock().await;
            if guard.loading {
                return SubmitOutcome::Busy;
            }
            guard.input.clear();
            guard.loading = true;
            guard.log.append_user(question);
            let typing_id = guard.log.append_typing();
            let request = ChatRequest {
                question: question.to_string(),
                session_id: guard.session_id.clone(),
            };
            (typing_id, request)
        };

        let result = tokio::select! {
            result = self.backend.send(request) => result,
            _ = self.shutdown.cancelled() => Err(ChatError::Cancelled),
        };

        let outcome = match result {
            Ok(response) => {
                let (answer, memory) = {
                    let mut guard = self.state.lock().await;
                    guard.adopt_session_id(response.session_id.as_deref());
                    guard.log.remove_by_id(typing_id);
                    prepare_reply(response)
                };
                debug!(
                    answer_chars = answer.chars().count(),
                    "revealing chat answer"
                );
                self.reveal
                    .reveal_with_progress(&self.state, &answer, Some(memory), on_char)
                    .await;
                SubmitOutcome::Answered
            }
            Err(err) => {
                error!(error = %err, "chat request failed");
                let mut guard = self.state.lock().await;
                guard.log.remove_by_id(typing_id);
                guard.log.append_error(REQUEST_FAILED_MESSAGE);
                SubmitOutcome::Failed
            }
        };

        self.state.lock().await.loading = false;
        outcome
    }

    /// Clear the transcript, session identity and memory visibility.
    /// Refused while a submission is in flight.
    pub async fn reset(&self) -> bool {
        let mut guard = self.state.lock().await;
        if guard.loading {
            return false;
        }
        guard.log.clear();
        guard.session_id = None;
        guard.show_memory = false;
        true
    }

    pub async fn toggle_memory(&self) -> bool {
        let mut guard = self.state.lock().await;
        guard.show_memory = !guard.show_memory;
        guard.show_memory
    }
}

fn prepare_reply(response: ChatResponse) -> (String, MemoryInfo) {
    let answer = clean_memory_content(&response.answer);
    let memory = MemoryInfo::new(
        clean_memory_content(response.memory_content.as_deref().unwrap_or_default()),
        response.memory_buffer_length,
    );
    (answer, memory)
}
