//! In-memory collaborators for exercising the access layer without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::access::{Principal, Resource, ResourceKind, ResourceStore};
use crate::auth::{AuthFailure, Authenticator};
use crate::database::DatabaseError;

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<i64, Principal>>,
    resources: Mutex<HashMap<(ResourceKind, i64), i64>>,
    lookups: AtomicUsize,
    fail_next: AtomicBool,
}

impl InMemoryStore {
    pub fn add_user(&self, id: i64, is_admin: bool) {
        self.users.lock().unwrap().insert(id, Principal { id, is_admin });
        self.add_resource(ResourceKind::User, id, id);
    }

    pub fn add_resource(&self, kind: ResourceKind, id: i64, owner_id: i64) {
        self.resources.lock().unwrap().insert((kind, id), owner_id);
    }

    /// Make the next call fail as if the database were unreachable
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_fault(&self) -> Result<(), DatabaseError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn lookup(&self, kind: ResourceKind, id: i64) -> Result<Option<Resource>, DatabaseError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;
        let owner = self.resources.lock().unwrap().get(&(kind, id)).copied();
        Ok(owner.map(|owner_id| Resource { id, owner_id }))
    }

    async fn principal(&self, user_id: i64) -> Result<Option<Principal>, DatabaseError> {
        self.check_fault()?;
        Ok(self.users.lock().unwrap().get(&user_id).copied())
    }
}

/// Fixed token → principal table.
#[derive(Default)]
pub struct StaticAuthenticator {
    tokens: HashMap<String, Principal>,
}

impl StaticAuthenticator {
    pub fn with_token(mut self, token: &str, principal: Principal) -> Self {
        self.tokens.insert(token.to_string(), principal);
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthFailure> {
        if bearer_token == "backend-down" {
            return Err(AuthFailure::Backend("token service unreachable".to_string()));
        }
        self.tokens
            .get(bearer_token)
            .copied()
            .ok_or_else(|| AuthFailure::InvalidToken("unknown token".to_string()))
    }
}
