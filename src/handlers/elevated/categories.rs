// handlers/elevated/categories.rs - category management

use axum::extract::State;
use serde::Deserialize;

use crate::access::{RequestContext, ResourceKind};
use crate::database::Category;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, ResourceId};
use crate::state::AppState;
use crate::validation::{FieldErrors, Rules, Validate};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryRequest {
    pub title: String,
}

impl Validate for CategoryRequest {
    fn validate(&self, _rules: &Rules) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required.");
        errors.into_result()
    }
}

/// POST /api/categories/create
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<JsonBody<CategoryRequest>, ApiError>,
) -> ApiResult<Category> {
    ctx.authorize_collection(ResourceKind::Category, true)?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;

    let category = state.categories().create(body.title.trim()).await?;
    Ok(ApiResponse::created("Category created successfully.", category))
}

/// PUT /api/categories/update/:id
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
    body: Result<JsonBody<CategoryRequest>, ApiError>,
) -> ApiResult<Category> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Category)?;
    ctx.authorize(&*state.store, ResourceKind::Category, id, true).await?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;

    let category = state
        .categories()
        .update(id, body.title.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found."))?;

    Ok(ApiResponse::success("Category updated successfully.", category))
}

/// DELETE /api/categories/delete/:id - 409 while posts still reference it
pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
) -> ApiResult<()> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Category)?;
    ctx.authorize(&*state.store, ResourceKind::Category, id, true).await?;

    if !state.categories().delete(id).await? {
        return Err(ApiError::not_found("Category not found."));
    }

    Ok(ApiResponse::message("Category deleted successfully."))
}
