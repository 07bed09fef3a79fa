//! Login, registration and logout.
//!
//! A failed attempt re-renders the login screen with an inline error and a
//! matching status code; success stores the user in the visit state and
//! redirects to `/`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::post;
use axum::{Extension, Form, Router};
use reportchat_core::{CoreError, SessionState, User};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::ServerError;
use crate::middleware::VisitId;
use crate::middleware::visit::visit_cookie;
use crate::render::AuthMode;
use crate::routes::pages::render;
use crate::schemas::forms::{LoginForm, RegisterForm};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ServerError> {
    let user = match form.validate() {
        Ok(()) => state.auth.login(&form.email, &form.password).await?,
        Err(_) => None,
    };
    match user {
        Some(user) => {
            info!(user_id = %user.id, "user logged in");
            Ok(sign_in(&state, visit, user))
        }
        None => {
            warn!("login rejected");
            rejected(&state, StatusCode::UNAUTHORIZED, "Invalid email or password", AuthMode::Login).await
        }
    }
}

async fn register(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ServerError> {
    if let Err(e) = form.validate() {
        let message = format!("Registration failed: {e}");
        return rejected(&state, StatusCode::BAD_REQUEST, &message, AuthMode::Register).await;
    }
    match state.auth.register(&form.name, &form.email, &form.password).await {
        Ok(user) => Ok(sign_in(&state, visit, user)),
        Err(CoreError::Invalid(reason)) => {
            let message = format!("Registration failed: {reason}");
            rejected(&state, StatusCode::BAD_REQUEST, &message, AuthMode::Register).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(visit): Extension<VisitId>,
) -> Redirect {
    state.visits.forget(visit.0);
    info!("user logged out");
    Redirect::to("/")
}

/// Start a fresh state for `user` under a new visit id; nothing from an
/// earlier login carries over and the pre-login cookie stops working.
fn sign_in(state: &AppState, visit: VisitId, user: User) -> Response {
    let fresh = Uuid::new_v4();
    let session = SessionState { user: Some(user), ..Default::default() };
    state.visits.forget(visit.0);
    state.visits.commit(fresh, session);

    let mut response = Redirect::to("/").into_response();
    if let Some(cookie) = visit_cookie(fresh) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

async fn rejected(
    state: &AppState,
    status: StatusCode,
    message: &str,
    mode: AuthMode,
) -> Result<Response, ServerError> {
    let page = render(state, &SessionState::default(), Some(message), mode).await?;
    Ok((status, page).into_response())
}
