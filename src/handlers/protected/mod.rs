// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Each handler authorizes through `RequestContext` first: anonymous callers
// get 401 before any lookup, then missing rows 404, then ownership 403.

pub mod auth;
pub mod blogs;
pub mod todos;
pub mod users;
