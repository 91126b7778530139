pub mod database;
pub mod token;
pub mod user;
