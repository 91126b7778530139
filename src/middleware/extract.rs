use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::access::{RequestContext, ResourceKind};
use crate::error::ApiError;

/// Numeric `:id` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Invalid id path segment: {}", rejection);
                ApiError::bad_request("Invalid id.")
            })?;
        Ok(ResourceId(id))
    }
}

impl ResourceId {
    /// Unwrap a path id only after the caller is known, so anonymous
    /// requests get 401 whether or not the segment parses.
    pub fn resolve(
        id: Result<Self, ApiError>,
        ctx: &RequestContext,
        kind: ResourceKind,
    ) -> Result<i64, ApiError> {
        if ctx.principal.is_none() {
            ctx.authorize_collection(kind, false)?;
        }
        id.map(|ResourceId(id)| id)
    }
}

/// `Json<T>` whose rejection uses the API error envelope
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::invalid_json("Invalid request."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Principal;

    fn bad_id() -> Result<ResourceId, ApiError> {
        Err(ApiError::bad_request("Invalid id."))
    }

    #[test]
    fn anonymous_caller_is_rejected_before_the_id() {
        let err = ResourceId::resolve(bad_id(), &RequestContext::anonymous(), ResourceKind::Blog)
            .unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = ResourceId::resolve(Ok(ResourceId(3)), &RequestContext::anonymous(), ResourceKind::Todo)
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn authenticated_caller_sees_the_id_outcome() {
        let ctx = RequestContext::authenticated(Principal { id: 5, is_admin: false });
        let err = ResourceId::resolve(bad_id(), &ctx, ResourceKind::Blog).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(ResourceId::resolve(Ok(ResourceId(3)), &ctx, ResourceKind::Blog).unwrap(), 3);
    }
}
