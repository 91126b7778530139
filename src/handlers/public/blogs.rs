// handlers/public/blogs.rs - read-only blog browsing

use axum::extract::State;

use crate::database::Blog;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ResourceId};
use crate::state::AppState;

/// GET /api/blogs
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Blog>> {
    let blogs = state.blogs().list().await?;
    Ok(ApiResponse::success("Successfully retrieved blogs.", blogs))
}

/// GET /api/blogs/category/:id
pub async fn list_by_category(
    State(state): State<AppState>,
    ResourceId(category_id): ResourceId,
) -> ApiResult<Vec<Blog>> {
    if state.categories().find_by_id(category_id).await?.is_none() {
        return Err(ApiError::not_found("Category not found."));
    }

    let blogs = state.blogs().list_by_category(category_id).await?;
    Ok(ApiResponse::success("Successfully retrieved blogs.", blogs))
}

/// GET /api/blogs/:id - 404 for posts by deactivated authors, as in the listings
pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> ApiResult<Blog> {
    let blog = state
        .blogs()
        .find_published(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found."))?;

    Ok(ApiResponse::success("Successfully retrieved blog.", blog))
}
