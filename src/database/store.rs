use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::access::{Principal, Resource, ResourceKind, ResourceStore};
use crate::database::manager::DatabaseError;

/// [`ResourceStore`] over the application tables.
#[derive(Clone)]
pub struct SqliteResourceStore {
    pool: SqlitePool,
}

impl SqliteResourceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for SqliteResourceStore {
    async fn lookup(&self, kind: ResourceKind, id: i64) -> Result<Option<Resource>, DatabaseError> {
        // Users own themselves; categories belong to no member
        let query = match kind {
            ResourceKind::User => "SELECT id, id AS owner_id FROM users WHERE id = ?",
            ResourceKind::Blog => "SELECT id, user_id AS owner_id FROM blogs WHERE id = ?",
            ResourceKind::Category => "SELECT id, 0 AS owner_id FROM categories WHERE id = ?",
            ResourceKind::Todo => "SELECT id, user_id AS owner_id FROM todos WHERE id = ?",
        };

        let row: Option<(i64, i64)> = sqlx::query_as(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, owner_id)| Resource { id, owner_id }))
    }

    async fn principal(&self, user_id: i64) -> Result<Option<Principal>, DatabaseError> {
        let row: Option<(i64, bool)> = sqlx::query_as(
            "SELECT id, is_admin FROM users WHERE id = ? AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, is_admin)| Principal { id, is_admin }))
    }
}
