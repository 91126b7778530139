// handlers/protected/todos.rs - personal todo list (owner or admin)

use axum::extract::State;
use serde::Deserialize;

use crate::access::{RequestContext, ResourceKind};
use crate::database::{Todo, TodoInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, ResourceId};
use crate::state::AppState;
use crate::validation::{FieldErrors, Rules, Validate};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
}

impl Validate for TodoRequest {
    fn validate(&self, _rules: &Rules) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required.");
        errors.into_result()
    }
}

impl From<TodoRequest> for TodoInput {
    fn from(req: TodoRequest) -> Self {
        TodoInput {
            title: req.title.trim().to_string(),
            description: req.description,
        }
    }
}

/// GET /api/todos - the caller's own todos
pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Vec<Todo>> {
    let principal = ctx.authorize_collection(ResourceKind::Todo, false)?;
    let todos = state.todos().list_for_user(principal.id).await?;
    Ok(ApiResponse::success("Successfully retrieved todos.", todos))
}

/// POST /api/todos
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<JsonBody<TodoRequest>, ApiError>,
) -> ApiResult<Todo> {
    let principal = ctx.authorize_collection(ResourceKind::Todo, false)?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;

    let todo = state.todos().create(principal.id, body.into()).await?;
    Ok(ApiResponse::created("Todo created successfully.", todo))
}

/// GET /api/todos/:id
pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
) -> ApiResult<Todo> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Todo)?;
    ctx.authorize(&*state.store, ResourceKind::Todo, id, false).await?;

    let todo = state
        .todos()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Todo not found."))?;

    Ok(ApiResponse::success("Successfully retrieved todo.", todo))
}

/// PUT /api/todos/:id
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
    body: Result<JsonBody<TodoRequest>, ApiError>,
) -> ApiResult<Todo> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Todo)?;
    ctx.authorize(&*state.store, ResourceKind::Todo, id, false).await?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;

    let todo = state
        .todos()
        .update(id, body.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Todo not found."))?;

    Ok(ApiResponse::success("Todo updated successfully.", todo))
}

/// DELETE /api/todos/:id - returns the removed todo
pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
) -> ApiResult<Todo> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::Todo)?;
    ctx.authorize(&*state.store, ResourceKind::Todo, id, false).await?;

    let todo = state
        .todos()
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Todo not found."))?;

    Ok(ApiResponse::success("Todo deleted successfully.", todo))
}
