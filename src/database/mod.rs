pub mod manager;
pub mod models;
pub mod store;

pub use manager::{Database, DatabaseError};
pub use models::{
    blog::{Blog, BlogInput, BlogRepository},
    category::{Category, CategoryRepository},
    todo::{Todo, TodoInput, TodoRepository},
    user::{NewUser, User, UserChanges, UserRepository},
};
pub use store::SqliteResourceStore;
