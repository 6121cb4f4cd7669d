use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use auth::{AuthError, GuardRejection};
use catalog::CatalogError;

/// Body of every response that only carries a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Failure of a single request, rendered as a status code and `{message}`
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Catalog(CatalogError),
    Guard(GuardRejection),
    Forbidden(&'static str),
    BadRequest(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Catalog(e)
    }
}

impl From<GuardRejection> for ApiError {
    fn from(e: GuardRejection) -> Self {
        ApiError::Guard(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

const SERVER_ERROR: &str = "Server error";

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Auth(e) => match e {
                AuthError::MissingCredentials | AuthError::InvalidRole(_) | AuthError::EmailTaken => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                AuthError::UserNotFound | AuthError::InvalidPassword => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string()),
            },
            ApiError::Catalog(e) => match e {
                CatalogError::Forbidden(message) => (StatusCode::FORBIDDEN, message.to_string()),
                CatalogError::Invalid(message) => (StatusCode::BAD_REQUEST, message.clone()),
                CatalogError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string()),
            },
            ApiError::Guard(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            // Detail stays in the log; the caller only sees the generic message.
            match &self {
                ApiError::Auth(e) => tracing::error!(error = %e, "request failed"),
                ApiError::Catalog(e) => tracing::error!(error = %e, "request failed"),
                other => tracing::error!(error = ?other, "request failed"),
            }
        } else if let ApiError::Guard(rejection) = &self {
            tracing::debug!(reason = ?rejection, "request rejected by auth guard");
        }

        (status, MessageResponse::new(message)).into_response()
    }
}
