use chrono::{DateTime, Utc};
use reportchat_core::User;

/// A row in the `users` table.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_salt: String,
    /// base64(SHA-256(salt ‖ password)).
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn to_user(&self) -> User {
        User { id: self.id.clone(), name: self.name.clone(), email: self.email.clone() }
    }
}
