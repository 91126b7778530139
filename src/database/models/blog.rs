use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::database::manager::DatabaseError;

/// A blog post joined with its author's display name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Blog {
    pub id: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub title: String,
    pub image_url: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub author: String,
}

#[derive(Debug, Clone)]
pub struct BlogInput {
    pub category_id: i64,
    pub title: String,
    pub image_url: String,
    pub content: String,
}

const SELECT_WITH_AUTHOR: &str =
    "SELECT blogs.*, users.name AS author FROM blogs JOIN users ON blogs.user_id = users.id";

#[derive(Clone)]
pub struct BlogRepository {
    pool: SqlitePool,
}

impl BlogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Posts by active authors, newest first
    pub async fn list(&self) -> Result<Vec<Blog>, DatabaseError> {
        let sql = format!("{SELECT_WITH_AUTHOR} WHERE users.is_active = TRUE ORDER BY blogs.id DESC");
        let blogs = sqlx::query_as::<_, Blog>(&sql).fetch_all(&self.pool).await?;
        Ok(blogs)
    }

    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Blog>, DatabaseError> {
        let sql = format!(
            "{SELECT_WITH_AUTHOR} WHERE blogs.category_id = ? AND users.is_active = TRUE ORDER BY blogs.id DESC"
        );
        let blogs = sqlx::query_as::<_, Blog>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(blogs)
    }

    /// Like [`find_by_id`](Self::find_by_id), but hides posts by deactivated authors
    pub async fn find_published(&self, id: i64) -> Result<Option<Blog>, DatabaseError> {
        let sql = format!("{SELECT_WITH_AUTHOR} WHERE blogs.id = ? AND users.is_active = TRUE");
        let blog = sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(blog)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Blog>, DatabaseError> {
        let sql = format!("{SELECT_WITH_AUTHOR} WHERE blogs.id = ?");
        let blog = sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(blog)
    }

    pub async fn create(&self, user_id: i64, input: BlogInput) -> Result<Blog, DatabaseError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO blogs (category_id, user_id, title, image_url, content)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(input.category_id)
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Category is no longer available."))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("blog {id}")))
    }

    pub async fn update(&self, id: i64, input: BlogInput) -> Result<Option<Blog>, DatabaseError> {
        let result = sqlx::query(
            "UPDATE blogs SET category_id = ?, title = ?, image_url = ?, content = ?,
             updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(input.category_id)
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(&input.content)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Category is no longer available."))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
