pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{authenticate_request, extract_bearer_token};
pub use extract::{JsonBody, ResourceId};
pub use response::{ApiResponse, ApiResult};
