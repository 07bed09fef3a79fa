//! The single page: `GET /` and the assets it links to.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use reportchat_core::SessionState;
use reportchat_core::chat::load_history;
use reportchat_core::view::ViewState;

use crate::error::ServerError;
use crate::middleware::VisitId;
use crate::render::{AuthMode, Page};
use crate::state::AppState;

const LOGO_SVG: &str = include_str!("../../static/logo.svg");

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/static/logo.svg", get(logo))
}

async fn index(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
) -> Result<Html<String>, ServerError> {
    let session = state.visits.checkout(visit.0);
    render(&state, &session, None, AuthMode::Login).await
}

async fn logo() -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/svg+xml")),
            (header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=86400")),
        ],
        LOGO_SVG,
    )
        .into_response()
}

/// One full render pass of the page for `session`.
///
/// History is read once here, after any mutation the calling handler made,
/// and the view state is resolved from it.
pub(super) async fn render(
    state: &AppState,
    session: &SessionState,
    error: Option<&str>,
    auth_mode: AuthMode,
) -> Result<Html<String>, ServerError> {
    let history = match (&session.user, &session.current_session) {
        (Some(_), Some(current)) => load_history(state.messages.as_ref(), &current.id).await,
        _ => Vec::new(),
    };
    let view = ViewState::resolve(session, &history);
    let sessions = if view.shows_chrome() {
        state.sessions.list_sessions(session).await?
    } else {
        Vec::new()
    };

    let mut page = Page::new(
        view,
        session.user.as_ref(),
        &sessions,
        session.current_session.as_ref(),
        &history,
    )
    .with_auth_mode(auth_mode);
    if let Some(error) = error {
        page = page.with_error(error);
    }
    Ok(Html(state.renderer.render_page(&page)?))
}
