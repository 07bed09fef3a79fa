//! `application/x-www-form-urlencoded` bodies posted by the pages.

use serde::Deserialize;
use validator::Validate;

use crate::error::ServerError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 256))]
    pub password: String,
}

/// Size limits on `prompt` are enforced in bytes by the chat turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalysisForm {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    /// Checked by `reportchat_core::analysis::check_data`.
    pub data: String,
}

/// Run the derived validators and turn failures into a 400.
pub fn validated<T: Validate>(form: T) -> Result<T, ServerError> {
    form.validate()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;
    Ok(form)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bad_email_is_rejected() {
        let form = LoginForm { email: "not-an-email".into(), password: "x".into() };
        assert!(matches!(validated(form), Err(ServerError::BadRequest(_))));
    }

    #[test]
    fn short_password_is_rejected_on_register() {
        let form = RegisterForm { name: String::new(), email: "a@b.co".into(), password: "123".into() };
        assert!(validated(form).is_err());
    }

    #[test]
    fn long_title_is_rejected() {
        let form = AnalysisForm { title: Some("t".repeat(201)), data: "x".into() };
        assert!(validated(form).is_err());
    }
}
