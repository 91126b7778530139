use std::sync::Arc;

use crate::access::ResourceStore;
use crate::auth::{Authenticator, JwtAuthenticator};
use crate::config::AppConfig;
use crate::database::{
    BlogRepository, CategoryRepository, Database, DatabaseError, SqliteResourceStore, TodoRepository,
    UserRepository,
};
use crate::validation::Rules;

/// Everything a handler needs, injected once at router construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Database,
    pub store: Arc<dyn ResourceStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub tokens: Arc<JwtAuthenticator>,
}

impl AppState {
    /// Wire the SQLite-backed collaborators around an open database
    pub fn new(config: AppConfig, database: Database) -> Self {
        let store: Arc<dyn ResourceStore> = Arc::new(SqliteResourceStore::new(database.pool().clone()));
        let tokens = Arc::new(JwtAuthenticator::new(&config.security, store.clone()));

        Self {
            config: Arc::new(config),
            database,
            store,
            authenticator: tokens.clone(),
            tokens,
        }
    }

    /// Connect to the configured database and wire the state
    pub async fn connect(config: AppConfig) -> Result<Self, DatabaseError> {
        let database = Database::connect(&config.database).await?;
        Ok(Self::new(config, database))
    }

    /// Swap the authenticator, keeping token issuance
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub fn rules(&self) -> Rules {
        Rules {
            min_password_length: self.config.security.min_password_length,
        }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.database.pool().clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.database.pool().clone())
    }

    pub fn blogs(&self) -> BlogRepository {
        BlogRepository::new(self.database.pool().clone())
    }

    pub fn todos(&self) -> TodoRepository {
        TodoRepository::new(self.database.pool().clone())
    }
}
