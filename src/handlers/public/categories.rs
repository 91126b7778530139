// handlers/public/categories.rs - GET /api/categories

use axum::extract::State;

use crate::database::Category;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.categories().list().await?;
    Ok(ApiResponse::success("Successfully retrieved categories.", categories))
}
