// handlers/mod.rs - 3-tier handler layout
//
// Public (anonymous) → Protected (bearer token) → Elevated (admin token)
//
// Every tier sees the same `RequestContext`; the tiers differ only in which
// access check a handler performs before touching the database.

pub mod elevated;
pub mod protected;
pub mod public;
