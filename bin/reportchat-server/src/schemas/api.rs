use reportchat_core::{AnalysisSession, Message};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: String,
    pub title: String,
    pub created_at: String,
    /// Whether this is the visit's current session.
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// `"user"` or `"assistant"`. System messages are never returned.
    pub role: String,
    pub content: String,
}

impl SessionResponse {
    pub fn from_session(session: &AnalysisSession, current: Option<&str>) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            created_at: session.created_at.to_rfc3339(),
            active: current == Some(session.id.as_str()),
        }
    }
}

impl From<&Message> for MessageResponse {
    fn from(m: &Message) -> Self {
        Self { role: m.role.to_string(), content: m.content.clone() }
    }
}
