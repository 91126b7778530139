use super::{AccessPolicy, Principal, Resource, ResourceKind, ResourceStore};
use crate::error::ApiError;

/// Per-request authorization context, extracted once by
/// [`crate::middleware::auth`] and passed to handlers by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    pub principal: Option<Principal>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self { principal: Some(principal) }
    }

    /// Authorize an action on an existing `kind` row and return it.
    ///
    /// The store is only consulted once the caller is known to be
    /// authenticated, so anonymous requests never learn whether `id` exists.
    pub async fn authorize(
        &self,
        store: &dyn ResourceStore,
        kind: ResourceKind,
        id: i64,
        require_admin: bool,
    ) -> Result<(Principal, Resource), ApiError> {
        let resource = match self.principal {
            Some(_) => store.lookup(kind, id).await?,
            None => None,
        };

        AccessPolicy::evaluate(self.principal.as_ref(), resource.as_ref(), require_admin)
            .into_result(kind)?;

        match (self.principal, resource) {
            (Some(principal), Some(resource)) => Ok((principal, resource)),
            _ => Err(ApiError::internal_server_error("Authorization state is inconsistent")),
        }
    }

    /// Authorize an action that does not target an existing row.
    pub fn authorize_collection(
        &self,
        kind: ResourceKind,
        require_admin: bool,
    ) -> Result<Principal, ApiError> {
        AccessPolicy::evaluate_collection(self.principal.as_ref(), require_admin)
            .into_result(kind)?;

        self.principal
            .ok_or_else(|| ApiError::internal_server_error("Authorization state is inconsistent"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    fn store() -> InMemoryStore {
        let store = InMemoryStore::default();
        store.add_user(5, false);
        store.add_user(1, true);
        store.add_resource(ResourceKind::Blog, 10, 5);
        store
    }

    #[tokio::test]
    async fn anonymous_request_skips_the_store() {
        let store = store();
        let err = RequestContext::anonymous()
            .authorize(&store, ResourceKind::Blog, 10, false)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn owner_receives_the_resource() {
        let store = store();
        let ctx = RequestContext::authenticated(Principal { id: 5, is_admin: false });
        let (principal, resource) = ctx.authorize(&store, ResourceKind::Blog, 10, false).await.unwrap();
        assert_eq!(principal.id, 5);
        assert_eq!(resource, Resource { id: 10, owner_id: 5 });
    }

    #[tokio::test]
    async fn missing_row_wins_over_ownership() {
        let store = store();
        let ctx = RequestContext::authenticated(Principal { id: 7, is_admin: false });
        let err = ctx.authorize(&store, ResourceKind::Blog, 99, true).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Blog not found.");
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let store = store();
        let ctx = RequestContext::authenticated(Principal { id: 7, is_admin: false });
        let err = ctx.authorize(&store, ResourceKind::Blog, 10, false).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn store_faults_propagate() {
        let store = store();
        store.fail_next();
        let ctx = RequestContext::authenticated(Principal { id: 5, is_admin: false });
        let err = ctx.authorize(&store, ResourceKind::Blog, 10, false).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn collection_requires_admin_when_asked() {
        let member = RequestContext::authenticated(Principal { id: 5, is_admin: false });
        assert_eq!(member.authorize_collection(ResourceKind::User, false).unwrap().id, 5);
        assert_eq!(member.authorize_collection(ResourceKind::User, true).unwrap_err().status_code(), 403);
        assert_eq!(
            RequestContext::anonymous()
                .authorize_collection(ResourceKind::User, false)
                .unwrap_err()
                .status_code(),
            401
        );
    }
}
