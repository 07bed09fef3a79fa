use thiserror::Error;

/// Errors surfaced by the collaborator traits and the flows built on them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The session / message / user store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The AI collaborator failed or is not configured.
    #[error("ai service error: {0}")]
    Ai(String),

    /// The referenced session (or other entity) does not exist for this user.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation needs an authenticated user.
    #[error("not authenticated")]
    Unauthorized,

    /// Caller input was rejected.
    #[error("invalid input: {0}")]
    Invalid(String),
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
