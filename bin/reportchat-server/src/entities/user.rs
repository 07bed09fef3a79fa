use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use reportchat_core::service::Authenticator;
use reportchat_core::{CoreError, User};
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use super::dao::UserRecord;
use super::{SqliteStore, parse_timestamp, storage_error};

impl SqliteStore {
    pub async fn insert_user(&self, record: &UserRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_salt, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_salt)
        .bind(&record.password_hash)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row: Option<(String, String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, name, email, password_salt, password_hash, created_at \
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, name, email, password_salt, password_hash, created_at)| UserRecord {
                id,
                name,
                email,
                password_salt,
                password_hash,
                created_at: parse_timestamp(&created_at, "users.created_at"),
            },
        ))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    STANDARD.encode(&digest[..])
}

#[async_trait]
impl Authenticator for SqliteStore {
    async fn login(&self, email: &str, password: &str) -> reportchat_core::Result<Option<User>> {
        let Some(record) = self
            .find_user_by_email(&normalize_email(email))
            .await
            .map_err(storage_error)?
        else {
            return Ok(None);
        };
        if hash_password(&record.password_salt, password) != record.password_hash {
            return Ok(None);
        }
        Ok(Some(record.to_user()))
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> reportchat_core::Result<User> {
        let email = normalize_email(email);
        if self.find_user_by_email(&email).await.map_err(storage_error)?.is_some() {
            return Err(CoreError::Invalid("an account with this email already exists".into()));
        }
        let salt = Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_owned(),
            password_hash: hash_password(&salt, password),
            password_salt: salt,
            email,
            created_at: Utc::now(),
        };
        self.insert_user(&record).await.map_err(storage_error)?;
        info!(user_id = %record.id, "user registered");
        Ok(record.to_user())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn register_then_login() {
        let store = SqliteStore::in_memory().await.unwrap();
        let user = store.register("Ada", " Ada@Example.com ", "hunter2").await.unwrap();
        assert_eq!(user.email, "ada@example.com");

        let logged_in = store.login("ada@example.com", "hunter2").await.unwrap();
        assert_eq!(logged_in, Some(user));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.register("Ada", "ada@example.com", "hunter2").await.unwrap();

        assert_eq!(store.login("ada@example.com", "hunter3").await.unwrap(), None);
        assert_eq!(store.login("bob@example.com", "hunter2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_email_is_invalid() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.register("Ada", "ada@example.com", "a").await.unwrap();
        let again = store.register("Ada 2", "ADA@example.com", "b").await;
        assert!(matches!(again, Err(CoreError::Invalid(_))));
    }

    #[test]
    fn hash_depends_on_salt() {
        assert_ne!(hash_password("s1", "pw"), hash_password("s2", "pw"));
        assert_eq!(hash_password("s1", "pw"), hash_password("s1", "pw"));
    }
}
