// handlers/elevated/users.rs - user administration

use axum::extract::State;

use crate::access::{RequestContext, ResourceKind};
use crate::database::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ResourceId};
use crate::state::AppState;

/// GET /api/users - every account, including deactivated ones
pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Vec<User>> {
    ctx.authorize_collection(ResourceKind::User, true)?;
    let users = state.users().list().await?;
    Ok(ApiResponse::success("Successfully retrieved users.", users))
}

/// DELETE /api/users/deactivate/:id - soft delete
pub async fn deactivate(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
) -> ApiResult<()> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::User)?;
    let (principal, _) = ctx.authorize(&*state.store, ResourceKind::User, id, true).await?;

    if !state.users().deactivate(id).await? {
        return Err(ApiError::not_found("User not found."));
    }

    tracing::info!("Admin {} deactivated user {}", principal.id, id);
    Ok(ApiResponse::message("User deleted successfully."))
}
