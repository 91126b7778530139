// handlers/public/auth.rs - POST /api/auth/register and POST /api/auth/login

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::database::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;
use crate::validation::{FieldErrors, Rules, Validate};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self, rules: &Rules) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required.");
        errors.email("email", &self.email);
        errors.password("password", &self.password, rules);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self, _rules: &Rules) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.email("email", &self.email);
        errors.require("password", &self.password, "Password is required.");
        errors.into_result()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

/// POST /api/auth/register - create a regular account
///
/// New accounts are never admins; promotion goes through `blog-admin promote`.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<User> {
    body.validate(&state.rules())?;

    let users = state.users();
    if users.email_taken(&body.email).await? {
        return Err(ApiError::conflict("User already exists."));
    }

    let user = users
        .create(NewUser {
            name: body.name.trim().to_string(),
            email: body.email,
            password_hash: hash_password(&body.password)?,
            is_admin: false,
        })
        .await?;

    tracing::info!("Registered user {}", user.id);
    Ok(ApiResponse::created("User registered successfully.", user))
}

/// POST /api/auth/login - exchange credentials for a bearer token
///
/// Unknown email, wrong password and deactivated account are
/// indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    body.validate(&state.rules())?;

    let user = state
        .users()
        .find_active_by_email(&body.email)
        .await?
        .filter(|user| verify_password(&user.password, &body.password));

    let Some(user) = user else {
        tracing::warn!("Failed login attempt");
        return Err(ApiError::bad_request("Invalid email or password."));
    };

    let token = state.tokens.issue(user.id)?;
    let expires_in = state.tokens.expires_in_secs()?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(
        "Login successful.",
        LoginResponse {
            token,
            expires_in,
            user,
        },
    ))
}
