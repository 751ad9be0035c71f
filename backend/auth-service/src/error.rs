use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use jwt_codec::VerifyError;

/// Every failure the auth surface can report, with a stable category and
/// message per variant. Detail strings on the 500-class variants are logged
/// and never written to the response body.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Member not found")]
    MemberNotFound,

    #[error("Member id already taken")]
    MemberAlreadyExists,

    #[error("Expired JWT token")]
    TokenExpired,

    #[error("JWT token is malformed")]
    MalformedToken,

    #[error("Unsupported JWT token")]
    UnsupportedToken,

    #[error("Invalid token argument")]
    InvalidTokenArgument,

    #[error("JWT token is missing")]
    MissingToken,

    #[error("Session expired or not found")]
    SessionNotFound,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Token reissue failed")]
    ReissueFailed,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid member id or password".to_string(),
            ),
            AuthError::MemberNotFound => {
                (StatusCode::BAD_REQUEST, "Member not found".to_string())
            }
            AuthError::MemberAlreadyExists => (
                StatusCode::CONFLICT,
                "Member id already taken".to_string(),
            ),
            AuthError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "Expired JWT token".to_string())
            }
            AuthError::MalformedToken => (
                StatusCode::BAD_REQUEST,
                "JWT token is malformed".to_string(),
            ),
            AuthError::UnsupportedToken => (
                StatusCode::BAD_REQUEST,
                "Unsupported JWT token".to_string(),
            ),
            AuthError::InvalidTokenArgument => (
                StatusCode::BAD_REQUEST,
                "Invalid token argument".to_string(),
            ),
            AuthError::MissingToken => {
                (StatusCode::BAD_REQUEST, "JWT token is missing".to_string())
            }
            AuthError::SessionNotFound => (
                StatusCode::UNAUTHORIZED,
                "Session expired or not found".to_string(),
            ),
            AuthError::StoreUnavailable(detail) => {
                tracing::error!(%detail, "session store unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Session store unavailable".to_string(),
                )
            }
            AuthError::ReissueFailed => {
                (StatusCode::BAD_REQUEST, "Token reissue failed".to_string())
            }
            AuthError::Database(detail) => {
                tracing::error!(%detail, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AuthError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<VerifyError> for AuthError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Expired => AuthError::TokenExpired,
            VerifyError::Malformed => AuthError::MalformedToken,
            VerifyError::Unsupported => AuthError::UnsupportedToken,
            VerifyError::InvalidArgument => AuthError::InvalidTokenArgument,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => AuthError::StoreUnavailable(detail),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}
