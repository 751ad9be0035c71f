//! Per-request authentication gate
//!
//! One pass, no retries: resolve the bearer token, verify the signature,
//! load the bound session. Signature expiry decides validity, store presence
//! decides revocability; both must hold before an identity is attached. A
//! store outage is a 500, never an auth verdict.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::AuthError;
use crate::AppState;

/// Identity attached to the request once the gate has passed.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub subject: String,
    pub roles: Vec<String>,
}

/// Middleware for the protected route subtree.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())
        .ok_or(AuthError::MissingToken)?
        .to_string();

    state.codec.verify(&token)?;

    let record = state
        .sessions
        .get_session(&token)
        .await? // store outage fails closed here
        .ok_or(AuthError::SessionNotFound)?;

    req.extensions_mut().insert(CurrentUser {
        subject: record.subject,
        roles: record.roles,
    });

    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>` -> token; anything else is missing.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Raw bearer token extractor for the endpoints that operate on the token
/// itself (logout, reissue).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(|t| BearerToken(t.to_string()))
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn resolves_bearer_scheme() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_is_none() {
        assert_eq!(bearer_token(&headers_with("garbage")), None);
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        // Scheme comparison is exact, lowercase "bearer" is not accepted.
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
    }
}
