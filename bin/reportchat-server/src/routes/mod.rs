//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (per-request trace id, visit cookie, `no-store` caching)
//! - The HTML page at `/` and the form posts that drive it
//! - Health route and the read-only `/api/v1` JSON routes
//! - Optional OpenAPI document (disable with `REPORTCHAT_ENABLE_API_DOCS=false`)

mod analysis;
mod api;
mod auth;
mod chat;
pub mod doc;
mod health;
mod pages;
mod sessions;

use std::sync::Arc;

use axum::http::{HeaderValue, header};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::{trace, visit};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(pages::router())
        .merge(auth::router())
        .merge(sessions::router())
        .merge(chat::router())
        .merge(analysis::router())
        .nest("/api/v1", api::router());

    if state.config.enable_api_docs {
        app = app.route("/api-docs/openapi.json", get(doc::openapi_json));
    }

    app
        // Pages depend on per-visit state, so nothing is cached unless the
        // handler says otherwise.
        .layer(ServiceBuilder::new().layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        )))
        .layer(middleware::from_fn(visit::visit_middleware))
        // Outermost: the trace span covers the visit middleware too.
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
