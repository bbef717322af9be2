//! Bearer token handling

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::domain::{DomainError, DomainResult, UserIdentity};
use crate::AppState;

/// The token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolve the session behind the request, or fail with UNAUTHORIZED
pub async fn require_session(state: &AppState, headers: &HeaderMap) -> DomainResult<UserIdentity> {
    let token = bearer_token(headers).ok_or_else(|| DomainError::Unauthorized("Missing session token".into()))?;
    state
        .sessions
        .resolve(token)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("Invalid or expired session".into()))
}

/// Check the cleanup endpoint's token when one is configured
pub fn check_cleanup_token(state: &AppState, headers: &HeaderMap) -> DomainResult<()> {
    match state.config.cleanup_token.as_deref() {
        None => Ok(()),
        Some(expected) if bearer_token(headers) == Some(expected) => Ok(()),
        Some(_) => Err(DomainError::Unauthorized("Invalid cleanup token".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer  abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
