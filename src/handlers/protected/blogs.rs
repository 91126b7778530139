// handlers/protected/blogs.rs - blog authoring (author or admin)

use axum::extract::State;
use serde::Deserialize;

use crate::access::{RequestContext, ResourceKind};
use crate::database::{Blog, BlogInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, ResourceId};
use crate::state::AppState;
use crate::validation::{FieldErrors, Rules, Validate};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogRequest {
    #[serde(alias = "categoryId")]
    pub category_id: i64,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    pub content: String,
}

impl Validate for BlogRequest {
    fn validate(&self, _rules: &Rules) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.positive_id("category_id", self.category_id, "Category is required.");
        errors.require("title", &self.title, "Title is required.");
        errors.url("image_url", &self.image_url, "Image URL is required.", "Invalid image URL.");
        errors.require("content", &self.content, "Content is required.");
        errors.into_result()
    }
}

impl From<BlogRequest> for BlogInput {
    fn from(req: BlogRequest) -> Self {
        BlogInput {
            category_id: req.category_id,
            title: req.title.trim().to_string(),
            image_url: req.image_url,
            content: req.content,
        }
    }
}

async fn ensure_category(state: &AppState, category_id: i64) -> Result<(), ApiError> {
    match state.categories().find_by_id(category_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Category not found.")),
    }
}

/// POST /api/blogs/create - any authenticated user
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<JsonBody<BlogRequest>, ApiError>,
) -> ApiResult<Blog> {
    let principal = ctx.authorize_collection(ResourceKind::Blog, false)?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;
    ensure_category(&state, body.category_id).await?;

    let blog = state.blogs().create(principal.id, body.into()).await?;

    tracing::info!("User {} created blog {}", principal.id, blog.id);
    Ok(ApiResponse::created("Blog created successfully.", blog))
}

/// PUT /api/blogs/update/:id
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
    body: Result<JsonBody<BlogRequest>, ApiError>,
) -> ApiResult<Blog> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Blog)?;
    ctx.authorize(&*state.store, ResourceKind::Blog, id, false).await?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;
    ensure_category(&state, body.category_id).await?;

    let blog = state
        .blogs()
        .update(id, body.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found."))?;

    Ok(ApiResponse::success("Blog updated successfully.", blog))
}

/// DELETE /api/blogs/delete/:id
pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
) -> ApiResult<()> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Blog)?;
    let (principal, _) = ctx.authorize(&*state.store, ResourceKind::Blog, id, false).await?;

    if !state.blogs().delete(id).await? {
        return Err(ApiError::not_found("Blog not found."));
    }

    tracing::info!("User {} deleted blog {}", principal.id, id);
    Ok(ApiResponse::message("Blog deleted successfully."))
}
