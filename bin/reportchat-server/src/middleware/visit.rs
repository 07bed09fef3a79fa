//! Visit cookie handling.
//!
//! Every request gets a [`VisitId`] extension. A visitor without a valid
//! `rc_visit` cookie is assigned a fresh id, and the cookie is set on the
//! response unless the handler already issued a visit cookie of its own
//! (sign-in rotates the id).

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

pub const VISIT_COOKIE: &str = "rc_visit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitId(pub Uuid);

pub async fn visit_middleware(mut req: Request<Body>, next: Next) -> Response {
    let existing = visit_from_headers(req.headers());
    let id = existing.unwrap_or_else(|| {
        let id = Uuid::new_v4();
        debug!(visit = %id, "new visit");
        id
    });
    req.extensions_mut().insert(VisitId(id));

    let mut response = next.run(req).await;

    if existing.is_none() && !sets_visit_cookie(response.headers()) {
        if let Some(value) = visit_cookie(id) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// `Set-Cookie` value carrying the visit id.
pub fn visit_cookie(id: Uuid) -> Option<HeaderValue> {
    let cookie = format!("{VISIT_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    HeaderValue::from_str(&cookie).ok()
}

fn sets_visit_cookie(headers: &HeaderMap) -> bool {
    let prefix = format!("{VISIT_COOKIE}=");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}

/// Read the visit id out of any `Cookie` header.
pub fn visit_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == VISIT_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
