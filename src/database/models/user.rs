use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Fields a profile update may touch. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Active users only; deactivated accounts cannot sign in.
    pub async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND is_active = TRUE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password, is_admin) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "User already exists."))
    }

    pub async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET
                name = ?,
                email = ?,
                password = COALESCE(?, password),
                is_admin = COALESCE(?, is_admin),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?
             RETURNING *",
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(changes.is_admin)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Email is already in use."))
    }

    /// Soft delete. Returns false when no such user exists.
    pub async fn deactivate(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET is_admin = ?, updated_at = CURRENT_TIMESTAMP WHERE email = ?",
        )
        .bind(is_admin)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::Database;

    async fn repository() -> UserRepository {
        let database = Database::connect(&AppConfig::for_tests().database).await.unwrap();
        UserRepository::new(database.pool().clone())
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "John Doe".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let users = repository().await;
        users.create(new_user("john@example.com")).await.unwrap();
        let err = users.create(new_user("john@example.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeps_unset_columns() {
        let users = repository().await;
        let user = users.create(new_user("john@example.com")).await.unwrap();
        let updated = users
            .update(
                user.id,
                UserChanges {
                    name: "Johnny".to_string(),
                    email: "john@example.com".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Johnny");
        assert_eq!(updated.password, "hash");
        assert!(!updated.is_admin);
    }

    #[tokio::test]
    async fn deactivated_users_cannot_be_found_for_login() {
        let users = repository().await;
        let user = users.create(new_user("john@example.com")).await.unwrap();
        assert!(users.deactivate(user.id).await.unwrap());
        assert!(users.find_active_by_email("john@example.com").await.unwrap().is_none());
        assert!(!users.find_by_id(user.id).await.unwrap().unwrap().is_active);
        assert!(!users.deactivate(999).await.unwrap());
    }
}
