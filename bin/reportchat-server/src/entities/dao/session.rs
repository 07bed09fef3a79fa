use chrono::{DateTime, Utc};
use reportchat_core::AnalysisSession;

/// A row in the `analysis_sessions` table.
#[derive(Debug, Clone)]
pub struct AnalysisSessionRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisSessionRecord {
    pub fn to_session(&self) -> AnalysisSession {
        AnalysisSession {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}
