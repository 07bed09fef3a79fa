//! Analysis submission: data in, report stored on the current session.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Extension, Form, Router};
use reportchat_core::analysis::check_data;

use crate::error::ServerError;
use crate::middleware::VisitId;
use crate::schemas::forms::{AnalysisForm, validated};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/analysis", post(submit_analysis))
}

async fn submit_analysis(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
    Form(form): Form<AnalysisForm>,
) -> Result<Redirect, ServerError> {
    let form = validated(form)?;
    let mut session = state.visits.checkout(visit.0);
    if !session.is_authenticated() || session.current_session.is_none() {
        return Ok(Redirect::to("/"));
    }

    // Data is checked before the rename: a rejected submit keeps the title.
    let data = check_data(&form.data)?;
    let title = form.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let renamed = match title {
        Some(title) => state.sessions.rename_current(&mut session, title).await,
        None => Ok(()),
    };
    let result = match renamed {
        Ok(()) => state.analysis.run(&mut session, data).await.map(drop),
        Err(e) => Err(e),
    };
    state.visits.commit(visit.0, session);

    result?;
    Ok(Redirect::to("/"))
}
