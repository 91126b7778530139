// handlers/elevated/mod.rs - Elevated handlers (admin token required)
//
// Same extraction as the protected tier; every check passes
// `require_admin = true`, so non-admins get 403 once the target exists.

pub mod categories;
pub mod users;
