//! Chat history loading and the follow-up question turn.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::model::{Message, Role};
use crate::report::find_report_text;
use crate::service::{ChatResponder, MessageStore};
use crate::state::SessionState;

/// Load the stored history of `session_id`.
///
/// A retrieval failure is logged and rendered as an empty history; the user
/// is not told.
pub async fn load_history(store: &dyn MessageStore, session_id: &str) -> Vec<Message> {
    match store.get_session_messages(session_id).await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(session_id, error = %e, "failed to load session messages; showing empty history");
            Vec::new()
        }
    }
}

/// Report text to send along with a question.
///
/// The cache is consulted first. Only when it is empty and `history` is
/// non-empty are system messages scanned; a hit is written back to the
/// cache. An empty string is a valid result.
pub fn resolve_context(state: &mut SessionState, history: &[Message]) -> String {
    if let Some(cached) = state.cached_report_text() {
        return cached.to_owned();
    }
    if history.is_empty() {
        return String::new();
    }
    match find_report_text(history) {
        Some(text) => {
            debug!(len = text.len(), "recovered report text from system message");
            state.current_report_text = Some(text.to_owned());
            text.to_owned()
        }
        None => String::new(),
    }
}

/// Longest accepted follow-up question, in bytes.
pub const MAX_PROMPT_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// No prompt was submitted.
    Ignored,
    Answered { prompt: String, response: String },
}

/// One follow-up question against the current session.
#[derive(Clone)]
pub struct ChatTurn {
    store: Arc<dyn MessageStore>,
    responder: Arc<dyn ChatResponder>,
}

impl ChatTurn {
    pub fn new(store: Arc<dyn MessageStore>, responder: Arc<dyn ChatResponder>) -> Self {
        Self { store, responder }
    }

    /// Persist `prompt`, ask the responder with the resolved report context,
    /// and persist the answer. `history` is the list read at the start of the
    /// render pass, before the prompt was saved.
    pub async fn submit(
        &self,
        state: &mut SessionState,
        prompt: Option<&str>,
        history: &[Message],
    ) -> Result<ChatOutcome> {
        let Some(prompt) = prompt.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(ChatOutcome::Ignored);
        };
        if prompt.len() > MAX_PROMPT_BYTES {
            return Err(CoreError::Invalid(format!(
                "prompt too large ({} bytes); maximum is {MAX_PROMPT_BYTES} bytes",
                prompt.len()
            )));
        }
        let session_id = state
            .current_session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or_else(|| CoreError::Invalid("no active session".into()))?;

        self.store.save_chat_message(&session_id, prompt, Role::User).await?;

        let context = resolve_context(state, history);
        debug!(session_id = %session_id, context_len = context.len(), "requesting chat response");

        let response = self.responder.get_chat_response(prompt, &context, history).await?;

        self.store.save_chat_message(&session_id, &response, Role::Assistant).await?;
        info!(session_id = %session_id, response_len = response.len(), "chat turn answered");

        Ok(ChatOutcome::Answered { prompt: prompt.to_owned(), response })
    }
}
