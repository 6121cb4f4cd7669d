use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;
use auth::{GuardRejection, Principal};

/// Middleware to require authentication
///
/// Runs the auth guard on the `Authorization` header and stores the
/// resolved [`Principal`] in the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // An unreadable header is treated as one without a token segment.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());

    let principal = state.guard.authenticate(header)?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extractor for the authenticated caller
/// Use this in handlers that are protected by [`require_auth`]
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(ApiError::Guard(GuardRejection::MissingToken))
    }
}
