use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::ApiError;

// --- Bearer extractor & token validation ---

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
            .map(|t| Bearer(t.to_string()))
            .ok_or_else(ApiError::unauthenticated)
    }
}

/// Resolves the caller's user id from a bearer token.
pub(crate) fn require_user(ctx: &AppContext, bearer: Bearer) -> Result<Uuid, ApiError> {
    ctx.credentials()
        .validate_token(&bearer.0)
        .map(|identity| identity.user_id)
        .map_err(|e| {
            tracing::debug!(error = ?e, "bearer_rejected");
            ApiError::unauthenticated()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, StubGeocoder, app_context};
    use axum::http::{Request, StatusCode};

    async fn extract(header: Option<&str>) -> Result<Bearer, ApiError> {
        let mut builder = Request::builder().uri("/api/places");
        if let Some(h) = header {
            builder = builder.header("authorization", h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Bearer::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_bearer_header() {
        let bearer = extract(Some("Bearer abc.def")).await.ok().unwrap();
        assert_eq!(bearer.0, "abc.def");
    }

    #[tokio::test]
    async fn scheme_name_is_case_insensitive() {
        for header in ["bearer abc.def", "BEARER abc.def"] {
            let bearer = extract(Some(header)).await.ok().unwrap();
            assert_eq!(bearer.0, "abc.def");
        }
    }

    #[tokio::test]
    async fn missing_or_foreign_scheme_is_unauthenticated() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer ")] {
            let err = extract(header).await.err().unwrap();
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn issued_token_resolves_to_its_user() {
        let ctx = app_context(&InMemoryStore::new(), StubGeocoder::ifc());
        let user_id = Uuid::new_v4();
        let issued = ctx.credentials().issue_token(user_id, "a@x.com").unwrap();

        assert_eq!(require_user(&ctx, Bearer(issued.token)).unwrap(), user_id);
        let err = require_user(&ctx, Bearer("not-a-jwt".into())).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
