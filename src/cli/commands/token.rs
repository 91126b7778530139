use std::sync::Arc;

use anyhow::anyhow;
use serde_json::json;

use crate::access::ResourceStore;
use crate::auth::JwtAuthenticator;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{Database, SqliteResourceStore};

/// Sign a token for an active user with the server's secret
pub async fn issue(
    database: &Database,
    config: &AppConfig,
    user_id: i64,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let token = sign(database, config, user_id).await?;
    output_success(output_format, "Token issued", Some(json!({ "token": token })))
}

async fn sign(database: &Database, config: &AppConfig, user_id: i64) -> anyhow::Result<String> {
    config.validate()?;

    let store: Arc<dyn ResourceStore> = Arc::new(SqliteResourceStore::new(database.pool().clone()));
    store
        .principal(user_id)
        .await?
        .ok_or_else(|| anyhow!("No active user with id {}", user_id))?;

    let tokens = JwtAuthenticator::new(&config.security, store);
    Ok(tokens.issue(user_id)?)
}
