// handlers/protected/auth.rs - GET /api/auth/whoami

use axum::extract::State;

use crate::access::{RequestContext, ResourceKind};
use crate::database::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/auth/whoami - the account behind the bearer token
pub async fn whoami(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<User> {
    let principal = ctx.authorize_collection(ResourceKind::User, false)?;

    let user = state
        .users()
        .find_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(ApiResponse::success("Successfully retrieved user.", user))
}
