//! Follow-up questions about the current session's report.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Extension, Form, Router};
use reportchat_core::chat::load_history;

use crate::error::ServerError;
use crate::middleware::VisitId;
use crate::schemas::forms::ChatForm;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(submit_prompt))
}

/// Run one chat turn, then redirect so the page re-renders from storage.
///
/// The visit state is committed even when the AI call fails, so a report
/// text recovered from history stays cached for the next attempt.
async fn submit_prompt(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
    Form(form): Form<ChatForm>,
) -> Result<Redirect, ServerError> {
    let mut session = state.visits.checkout(visit.0);
    let Some(current) = session.current_session.clone().filter(|_| session.is_authenticated()) else {
        return Ok(Redirect::to("/"));
    };

    let history = load_history(state.messages.as_ref(), &current.id).await;
    let outcome = state.chat.submit(&mut session, form.prompt.as_deref(), &history).await;
    state.visits.commit(visit.0, session);

    outcome?;
    Ok(Redirect::to("/"))
}
