use async_trait::async_trait;
use chrono::Utc;
use reportchat_core::service::MessageStore;
use reportchat_core::{Message, Role};
use uuid::Uuid;

use super::dao::ChatMessageRecord;
use super::{SqliteStore, parse_timestamp, storage_error};

impl SqliteStore {
    pub async fn append_message(&self, msg: &ChatMessageRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO chat_messages (id, session_id, role, content, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&msg.id)
        .bind(&msg.session_id)
        .bind(&msg.role)
        .bind(&msg.content)
        .bind(msg.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Messages of one session in insertion order.
    pub async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessageRecord>, sqlx::Error> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, session_id, role, content, created_at \
             FROM chat_messages WHERE session_id = ?1 ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, session_id, role, content, created_at)| ChatMessageRecord {
                id,
                session_id,
                role,
                content,
                created_at: parse_timestamp(&created_at, "chat_messages.created_at"),
            })
            .collect())
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn get_session_messages(&self, session_id: &str) -> reportchat_core::Result<Vec<Message>> {
        let records = self.list_messages(session_id).await.map_err(storage_error)?;
        Ok(records
            .into_iter()
            .map(|r| Message::new(Role::from_stored(&r.role), r.content))
            .collect())
    }

    async fn save_chat_message(
        &self,
        session_id: &str,
        content: &str,
        role: Role,
    ) -> reportchat_core::Result<()> {
        let record = ChatMessageRecord {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_owned(),
            role: role.to_string(),
            content: content.to_owned(),
            created_at: Utc::now(),
        };
        self.append_message(&record).await.map_err(storage_error)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use reportchat_core::service::{Authenticator, SessionService};

    #[tokio::test]
    async fn messages_come_back_in_insertion_order_with_roles() {
        let store = SqliteStore::in_memory().await.unwrap();
        let user = store.register("Ada", "ada@example.com", "pw").await.unwrap();
        let session = store.create_chat_session(&user).await.unwrap();

        store.save_chat_message(&session.id, "meta", Role::System).await.unwrap();
        store.save_chat_message(&session.id, "q", Role::User).await.unwrap();
        store.save_chat_message(&session.id, "a", Role::Assistant).await.unwrap();

        let messages = store.get_session_messages(&session.id).await.unwrap();
        assert_eq!(
            messages,
            vec![Message::system("meta"), Message::user("q"), Message::assistant("a")]
        );
    }

    #[tokio::test]
    async fn messages_for_unknown_session_cannot_be_saved() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.save_chat_message("missing", "q", Role::User).await.is_err());
        assert!(store.get_session_messages("missing").await.unwrap().is_empty());
    }
}
