use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct TodoInput {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct TodoRepository {
    pool: SqlitePool,
}

impl TodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, DatabaseError> {
        let todos = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    pub async fn create(&self, user_id: i64, input: TodoInput) -> Result<Todo, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (user_id, title, description) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    pub async fn update(&self, id: i64, input: TodoInput) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET title = ?, description = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ? RETURNING *",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>("DELETE FROM todos WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }
}
