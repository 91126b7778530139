// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, service status and read-only blog browsing.

pub mod auth;
pub mod blogs;
pub mod categories;
pub mod system;
