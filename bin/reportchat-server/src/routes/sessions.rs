//! Sidebar actions: create, switch and close analysis sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::post;
use axum::{Extension, Router};
use reportchat_core::session::SessionManager;

use crate::error::ServerError;
use crate::middleware::VisitId;
use crate::render::AuthMode;
use crate::routes::pages::render;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}/select", post(select_session))
        .route("/sessions/close", post(close_session))
}

/// Create a session and make it current. On failure the page is re-rendered
/// with an inline error and the visit state is left as it was.
async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
) -> Result<Response, ServerError> {
    let mut session = state.visits.checkout(visit.0);
    if !session.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }
    match state.sessions.create_chat_session(&mut session).await {
        Ok(_) => {
            state.visits.commit(visit.0, session);
            Ok(Redirect::to("/").into_response())
        }
        Err(_) => {
            let page = render(&state, &session, Some("Failed to create session"), AuthMode::Login).await?;
            Ok(page.into_response())
        }
    }
}

async fn select_session(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
    Path(id): Path<String>,
) -> Result<Redirect, ServerError> {
    let mut session = state.visits.checkout(visit.0);
    state.sessions.select_session(&mut session, &id).await?;
    state.visits.commit(visit.0, session);
    Ok(Redirect::to("/"))
}

async fn close_session(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
) -> Redirect {
    let mut session = state.visits.checkout(visit.0);
    SessionManager::close_session(&mut session);
    state.visits.commit(visit.0, session);
    Redirect::to("/")
}
