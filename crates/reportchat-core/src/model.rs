use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An authenticated user. Owned by the authenticator; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Name shown in the greeting; falls back to the email when `name` is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// One report + conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Side channel carrying sentinel-wrapped report text. Never displayed.
    System,
}

impl Role {
    /// Parse a stored role string. Anything unrecognised is treated as an
    /// assistant-side message so it still renders with the non-user style.
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or(Role::Assistant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_name_prefers_name() {
        let user = User { id: "u1".into(), name: "Ada".into(), email: "ada@example.com".into() };
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = User { id: "u1".into(), name: "  ".into(), email: "ada@example.com".into() };
        assert_eq!(user.display_name(), "ada@example.com");
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::from_stored("user"), Role::User);
        assert_eq!(Role::from_stored("tool"), Role::Assistant);
    }
}
