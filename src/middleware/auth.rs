use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::access::RequestContext;
use crate::auth::AuthFailure;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the bearer token (if any) and attach a [`RequestContext`] to the request.
///
/// Missing, malformed, invalid or expired tokens leave the request anonymous;
/// the access policy turns that into 401 on guarded routes. Only an
/// authenticator fault aborts the request here.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = match extract_bearer_token(request.headers()) {
        Ok(token) => match state.authenticator.authenticate(token).await {
            Ok(principal) => RequestContext::authenticated(principal),
            Err(AuthFailure::Backend(msg)) => return Err(AuthFailure::Backend(msg).into()),
            Err(failure) => {
                tracing::warn!("Rejected bearer token: {}", failure);
                RequestContext::anonymous()
            }
        },
        Err(AuthFailure::MissingToken) => RequestContext::anonymous(),
        Err(failure) => {
            tracing::debug!("Ignoring Authorization header: {}", failure);
            RequestContext::anonymous()
        }
    };

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthFailure::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthFailure::MalformedHeader)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthFailure::MalformedHeader),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<RequestContext>().copied().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_distinguished() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthFailure::MissingToken)
        ));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "Bearer    ", "abc.def.ghi"] {
            assert!(matches!(
                extract_bearer_token(&headers(value)),
                Err(AuthFailure::MalformedHeader)
            ));
        }
    }
}
