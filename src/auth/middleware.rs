//! Identity middleware
//!
//! Resolves the bearer token (if any) into an [`Identity`] and attaches it
//! to the request extensions. This middleware never rejects: a missing or
//! invalid token yields an anonymous identity, and the request validator
//! owns the `Unauthenticated` failure. That keeps all error decoding for
//! the claim operation in one place.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::Identity;
use crate::gateway::state::AppState;

pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = match bearer_token(request.headers()) {
        Some(token) => match state.auth.verify_token(token) {
            Ok(claims) => Identity::user(claims.sub),
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer token");
                Identity::anonymous()
            }
        },
        None => Identity::anonymous(),
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}
