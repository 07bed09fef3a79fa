//! Collaborator interfaces consumed by the UI flows.
//!
//! Each trait is a narrow seam: the server wires the SQLite store and the
//! OpenAI-compatible client behind them, tests wire in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AnalysisSession, Message, Role, User};

/// Creates and looks up analysis sessions.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn create_chat_session(&self, owner: &User) -> Result<AnalysisSession>;

    /// Returns `None` when the session does not exist or belongs to another user.
    async fn get_chat_session(&self, owner: &User, id: &str) -> Result<Option<AnalysisSession>>;

    /// Sessions owned by `owner`, most recent first.
    async fn list_chat_sessions(&self, owner: &User) -> Result<Vec<AnalysisSession>>;

    async fn rename_chat_session(&self, id: &str, title: &str) -> Result<()>;
}

/// Ordered message log per session.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages in insertion order, system messages included.
    async fn get_session_messages(&self, session_id: &str) -> Result<Vec<Message>>;

    async fn save_chat_message(&self, session_id: &str, content: &str, role: Role) -> Result<()>;
}

/// Answers follow-up questions about a report.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// `context_text` may be empty; `messages` is the stored history as read
    /// before the new prompt was saved.
    async fn get_chat_response(
        &self,
        prompt: &str,
        context_text: &str,
        messages: &[Message],
    ) -> Result<String>;
}

/// Turns submitted analysis data into report text.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate_report(&self, data: &str) -> Result<String>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` for unknown email or wrong password.
    async fn login(&self, email: &str, password: &str) -> Result<Option<User>>;

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User>;
}
