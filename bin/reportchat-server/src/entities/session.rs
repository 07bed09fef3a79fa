use async_trait::async_trait;
use chrono::Utc;
use reportchat_core::service::SessionService;
use reportchat_core::{AnalysisSession, User};
use uuid::Uuid;

use super::dao::AnalysisSessionRecord;
use super::{SqliteStore, parse_timestamp, storage_error};

type SessionRow = (String, String, String, String, String);

fn from_row((id, user_id, title, created_at, updated_at): SessionRow) -> AnalysisSessionRecord {
    AnalysisSessionRecord {
        id,
        user_id,
        title,
        created_at: parse_timestamp(&created_at, "analysis_sessions.created_at"),
        updated_at: parse_timestamp(&updated_at, "analysis_sessions.updated_at"),
    }
}

impl SqliteStore {
    pub async fn insert_session(&self, record: &AnalysisSessionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO analysis_sessions (id, user_id, title, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.title)
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_session_for_user(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<AnalysisSessionRecord>, sqlx::Error> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, user_id, title, created_at, updated_at \
             FROM analysis_sessions WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(from_row))
    }

    pub async fn list_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<AnalysisSessionRecord>, sqlx::Error> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT id, user_id, title, created_at, updated_at \
             FROM analysis_sessions WHERE user_id = ?1 ORDER BY rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    pub async fn update_session_title(&self, id: &str, title: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE analysis_sessions SET title = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(title)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionService for SqliteStore {
    async fn create_chat_session(&self, owner: &User) -> reportchat_core::Result<AnalysisSession> {
        let now = Utc::now();
        let record = AnalysisSessionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: owner.id.clone(),
            title: format!("Analysis {}", now.format("%Y-%m-%d %H:%M")),
            created_at: now,
            updated_at: now,
        };
        self.insert_session(&record).await.map_err(storage_error)?;
        Ok(record.to_session())
    }

    async fn get_chat_session(
        &self,
        owner: &User,
        id: &str,
    ) -> reportchat_core::Result<Option<AnalysisSession>> {
        let record = self.get_session_for_user(&owner.id, id).await.map_err(storage_error)?;
        Ok(record.as_ref().map(AnalysisSessionRecord::to_session))
    }

    async fn list_chat_sessions(&self, owner: &User) -> reportchat_core::Result<Vec<AnalysisSession>> {
        let records = self.list_sessions_for_user(&owner.id).await.map_err(storage_error)?;
        Ok(records.iter().map(AnalysisSessionRecord::to_session).collect())
    }

    async fn rename_chat_session(&self, id: &str, title: &str) -> reportchat_core::Result<()> {
        let affected = self.update_session_title(id, title).await.map_err(storage_error)?;
        if affected == 0 {
            return Err(reportchat_core::CoreError::NotFound(format!("session {id}")));
        }
        Ok(())
    }
}
