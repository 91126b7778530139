use anyhow::bail;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::{Database, UserRepository};

/// Promote or demote by email; the next request with that user's token sees
/// the new role since principals are resolved per request.
pub async fn set_admin(
    database: &Database,
    email: &str,
    is_admin: bool,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let users = UserRepository::new(database.pool().clone());
    if !users.set_admin(email, is_admin).await? {
        bail!("User '{}' not found", email);
    }

    let message = if is_admin {
        format!("User '{}' is now an admin", email)
    } else {
        format!("User '{}' is no longer an admin", email)
    };
    tracing::info!("{}", message);

    output_success(output_format, &message, Some(json!({ "email": email, "is_admin": is_admin })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::NewUser;

    #[tokio::test]
    async fn promotes_and_demotes_existing_users() {
        let database = Database::connect(&AppConfig::for_tests().database).await.unwrap();
        let users = UserRepository::new(database.pool().clone());
        users
            .create(NewUser {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                password_hash: "hash".to_string(),
                is_admin: false,
            })
            .await
            .unwrap();

        set_admin(&database, "jane@example.com", true, &OutputFormat::Json).await.unwrap();
        let user = users.find_active_by_email("jane@example.com").await.unwrap().unwrap();
        assert!(user.is_admin);

        set_admin(&database, "jane@example.com", false, &OutputFormat::Text).await.unwrap();
        let user = users.find_active_by_email("jane@example.com").await.unwrap().unwrap();
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn unknown_email_is_an_error() {
        let database = Database::connect(&AppConfig::for_tests().database).await.unwrap();
        let err = set_admin(&database, "ghost@example.com", true, &OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ghost@example.com"));
    }
}
