//! Read-only JSON view of the logged-in visit's sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use reportchat_core::view::visible_messages;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::middleware::VisitId;
use crate::schemas::api::{MessageResponse, SessionResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_sessions, list_session_messages),
    components(schemas(SessionResponse, MessageResponse))
)]
pub struct SessionApi;

/// Routes nested under `/api/v1`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}/messages", get(list_session_messages))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "sessions",
    responses(
        (status = 200, description = "Sessions of the logged-in user, newest first", body = Vec<SessionResponse>),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
) -> Result<Json<Vec<SessionResponse>>, ServerError> {
    let session = state.visits.checkout(visit.0);
    if !session.is_authenticated() {
        return Err(ServerError::Unauthorized);
    }
    let current = session.current_session.as_ref().map(|s| s.id.as_str());
    let sessions = state.sessions.list_sessions(&session).await?;
    Ok(Json(sessions.iter().map(|s| SessionResponse::from_session(s, current)).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/messages",
    tag = "sessions",
    params(("id" = String, Path, description = "Analysis session id")),
    responses(
        (status = 200, description = "Visible messages in order", body = Vec<MessageResponse>),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such session for this user"),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn list_session_messages(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MessageResponse>>, ServerError> {
    let session = state.visits.checkout(visit.0);
    if !session.is_authenticated() {
        return Err(ServerError::Unauthorized);
    }
    if state.sessions.find_session(&session, &id).await?.is_none() {
        return Err(ServerError::NotFound(format!("session {id}")));
    }
    let messages = state.messages.get_session_messages(&id).await?;
    Ok(Json(visible_messages(&messages).map(MessageResponse::from).collect()))
}
