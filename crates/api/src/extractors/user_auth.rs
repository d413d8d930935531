//! User JWT authentication extractor.
//!
//! Validates Supabase access tokens from the `Authorization: Bearer` header
//! against the verifier held in [`AppState`].

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use shared::jwt::{JwtError, JwtVerifier};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated user information from the access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Supabase auth user id (the `sub` claim).
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl UserAuth {
    fn from_token(verifier: &JwtVerifier, token: &str) -> Result<Self, JwtError> {
        let claims = verifier.validate(token)?;
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }

        let token = bearer_token(&parts.headers)?;
        let auth = UserAuth::from_token(&state.jwt, token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            match e {
                JwtError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
                _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
            }
        })?;

        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}

/// Optional user authentication.
///
/// A missing or invalid token yields `None` rather than a rejection, so
/// public routes can personalise responses for signed-in callers.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

impl OptionalUserAuth {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|a| a.user_id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get(header::AUTHORIZATION).is_none() {
            return Ok(OptionalUserAuth(None));
        }
        Ok(OptionalUserAuth(
            UserAuth::from_request_parts(parts, state).await.ok(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use shared::jwt::{Claims, DEFAULT_AUDIENCE};

    fn verifier() -> JwtVerifier {
        JwtVerifier::new("unit-test-secret", DEFAULT_AUDIENCE, 0)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        assert!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers_with("Bearer ")).is_err());
    }

    #[test]
    fn test_from_token_reads_claims() {
        let verifier = verifier();
        let user_id = Uuid::new_v4();
        let token = verifier
            .sign(&Claims::for_user(user_id, Some("viewer@example.com"), 3600))
            .unwrap();

        let auth = UserAuth::from_token(&verifier, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.email.as_deref(), Some("viewer@example.com"));
    }

    #[test]
    fn test_from_token_rejects_foreign_secret() {
        let other = JwtVerifier::new("another-secret", DEFAULT_AUDIENCE, 0);
        let token = other
            .sign(&Claims::for_user(Uuid::new_v4(), None, 3600))
            .unwrap();
        assert!(UserAuth::from_token(&verifier(), &token).is_err());
    }

    #[test]
    fn test_optional_user_id() {
        let id = Uuid::new_v4();
        let auth = OptionalUserAuth(Some(UserAuth {
            user_id: id,
            email: None,
        }));
        assert_eq!(auth.user_id(), Some(id));
        assert_eq!(OptionalUserAuth(None).user_id(), None);
    }
}
