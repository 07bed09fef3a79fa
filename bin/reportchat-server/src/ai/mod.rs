//! AI collaborators: report generation and follow-up answers.

pub mod openai;

pub use openai::OpenAiClient;

use reportchat_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// No API key was configured, so no upstream call is attempted.
    #[error("AI service is not configured (set REPORTCHAT_AI_API_KEY)")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered without any choice text.
    #[error("AI service returned an empty completion")]
    EmptyCompletion,
}

impl From<AiError> for CoreError {
    fn from(e: AiError) -> Self {
        CoreError::Ai(e.to_string())
    }
}
