// handlers/protected/users.rs - self-service user endpoints (self or admin)

use axum::extract::State;
use serde::Deserialize;

use crate::access::{RequestContext, ResourceKind};
use crate::auth::password::hash_password;
use crate::database::{User, UserChanges};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, ResourceId};
use crate::state::AppState;
use crate::validation::{FieldErrors, Rules, Validate};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    /// Omitted or empty keeps the current password
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UpdateUserRequest {
    fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self, rules: &Rules) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required.");
        errors.email("email", &self.email);
        if let Some(password) = self.new_password() {
            errors.password("password", password, rules);
        }
        errors.into_result()
    }
}

/// GET /api/users/get/:id
pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
) -> ApiResult<User> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::User)?;
    ctx.authorize(&*state.store, ResourceKind::User, id, false).await?;

    let user = state
        .users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(ApiResponse::success("Successfully retrieved user.", user))
}

/// PUT /api/users/update/:id
///
/// Only admins may change `is_admin`; a non-admin sending a different value
/// is refused with 403.
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<ResourceId, ApiError>,
    body: Result<JsonBody<UpdateUserRequest>, ApiError>,
) -> ApiResult<User> {
    let id = ResourceId::resolve(id, &ctx, ResourceKind::User)?;
    let (principal, _) = ctx.authorize(&*state.store, ResourceKind::User, id, false).await?;
    let JsonBody(body) = body?;
    body.validate(&state.rules())?;

    let users = state.users();
    let current = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    if let Some(is_admin) = body.is_admin {
        if is_admin != current.is_admin && !principal.is_admin {
            tracing::warn!("User {} tried to change admin flag of user {}", principal.id, id);
            return Err(ApiError::forbidden("Forbidden."));
        }
    }

    let password_hash = body.new_password().map(hash_password).transpose()?;

    let user = users
        .update(
            id,
            UserChanges {
                name: body.name.trim().to_string(),
                email: body.email,
                password_hash,
                is_admin: body.is_admin,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(ApiResponse::success("User updated successfully.", user))
}
