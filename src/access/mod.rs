//! Ownership-and-role access control.
//!
//! Every guarded endpoint funnels through [`AccessPolicy::evaluate`]: the
//! authenticated principal (if any) and the target resource (if it exists)
//! go in, a [`Decision`] comes out. The policy performs no I/O; resolving the
//! principal and loading the resource is the job of the [`Authenticator`] and
//! [`ResourceStore`] collaborators.
//!
//! Check order is fixed: not authenticated, then not found, then
//! admin/ownership.
//!
//! [`Authenticator`]: crate::auth::Authenticator

pub mod context;
pub mod status;

use async_trait::async_trait;
use serde::Serialize;

use crate::database::DatabaseError;

pub use context::RequestContext;
pub use status::Denial;

/// The actor behind a request, resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i64,
    pub is_admin: bool,
}

/// A persisted entity with a single owning principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub id: i64,
    pub owner_id: i64,
}

/// Entity families guarded by the policy. Used to label `NotFound` denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Blog,
    Category,
    Todo,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::User => "User",
            ResourceKind::Blog => "Blog",
            ResourceKind::Category => "Category",
            ResourceKind::Todo => "Todo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Ok,
    NotAuthenticated,
    NotOwner,
    NotAdmin,
    NotFound,
}

/// Outcome of an authorization check.
///
/// `allowed` is true exactly when `reason` is [`Reason::Ok`]; the fields are
/// private so the pairing cannot be broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decision {
    allowed: bool,
    reason: Reason,
}

impl Decision {
    pub const fn allow() -> Self {
        Self { allowed: true, reason: Reason::Ok }
    }

    /// Deny with `reason`. Passing [`Reason::Ok`] yields an allow decision.
    pub const fn deny(reason: Reason) -> Self {
        match reason {
            Reason::Ok => Self::allow(),
            _ => Self { allowed: false, reason },
        }
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }
}

pub struct AccessPolicy;

impl AccessPolicy {
    pub fn evaluate(
        principal: Option<&Principal>,
        resource: Option<&Resource>,
        require_admin: bool,
    ) -> Decision {
        let Some(principal) = principal else {
            return Decision::deny(Reason::NotAuthenticated);
        };
        let Some(resource) = resource else {
            return Decision::deny(Reason::NotFound);
        };

        if require_admin {
            if !principal.is_admin {
                return Decision::deny(Reason::NotAdmin);
            }
        } else if principal.id != resource.owner_id && !principal.is_admin {
            return Decision::deny(Reason::NotOwner);
        }

        Decision::allow()
    }

    /// Evaluate an action that does not target an existing row, such as
    /// listing every user or creating a post. Whatever the caller creates is
    /// theirs, so the target counts as owned by the caller.
    pub fn evaluate_collection(principal: Option<&Principal>, require_admin: bool) -> Decision {
        let owned = principal.map(|p| Resource { id: 0, owner_id: p.id });
        Self::evaluate(principal, owned.as_ref(), require_admin)
    }
}

/// Read access to resource ownership, backed by the persistence layer.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Load the owner of `kind` row `id`, or `None` when it does not exist.
    async fn lookup(&self, kind: ResourceKind, id: i64) -> Result<Option<Resource>, DatabaseError>;

    /// Load the principal for an active user.
    async fn principal(&self, user_id: i64) -> Result<Option<Principal>, DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBER: Principal = Principal { id: 5, is_admin: false };
    const ADMIN: Principal = Principal { id: 1, is_admin: true };

    fn owned_by(owner_id: i64) -> Resource {
        Resource { id: 1, owner_id }
    }

    #[test]
    fn anonymous_is_never_authenticated() {
        for resource in [None, Some(owned_by(5)), Some(owned_by(9))] {
            for require_admin in [false, true] {
                let decision = AccessPolicy::evaluate(None, resource.as_ref(), require_admin);
                assert_eq!(decision, Decision::deny(Reason::NotAuthenticated));
                assert!(!decision.allowed());
            }
        }
    }

    #[test]
    fn missing_resource_is_not_found() {
        for principal in [MEMBER, ADMIN] {
            for require_admin in [false, true] {
                let decision = AccessPolicy::evaluate(Some(&principal), None, require_admin);
                assert_eq!(decision.reason(), Reason::NotFound);
                assert!(!decision.allowed());
            }
        }
    }

    #[test]
    fn admin_may_act_on_anything() {
        for owner in [1, 5, 9, 42] {
            let decision = AccessPolicy::evaluate(Some(&ADMIN), Some(&owned_by(owner)), false);
            assert_eq!(decision, Decision::allow());
        }
        let decision = AccessPolicy::evaluate(Some(&ADMIN), Some(&owned_by(9)), true);
        assert_eq!(decision, Decision::allow());
    }

    #[test]
    fn owner_is_allowed() {
        let decision = AccessPolicy::evaluate(Some(&MEMBER), Some(&owned_by(5)), false);
        assert!(decision.allowed());
        assert_eq!(decision.reason(), Reason::Ok);
    }

    #[test]
    fn stranger_is_not_owner() {
        let decision = AccessPolicy::evaluate(Some(&MEMBER), Some(&owned_by(9)), false);
        assert_eq!(decision, Decision::deny(Reason::NotOwner));
    }

    #[test]
    fn ownership_does_not_grant_admin_actions() {
        let decision = AccessPolicy::evaluate(Some(&MEMBER), Some(&owned_by(5)), true);
        assert_eq!(decision, Decision::deny(Reason::NotAdmin));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let resource = owned_by(9);
        let first = AccessPolicy::evaluate(Some(&MEMBER), Some(&resource), false);
        let second = AccessPolicy::evaluate(Some(&MEMBER), Some(&resource), false);
        assert_eq!(first, second);
    }

    #[test]
    fn deny_with_ok_reason_allows() {
        assert_eq!(Decision::deny(Reason::Ok), Decision::allow());
        for reason in [Reason::NotAuthenticated, Reason::NotOwner, Reason::NotAdmin, Reason::NotFound] {
            assert!(!Decision::deny(reason).allowed());
        }
    }

    #[test]
    fn collection_actions() {
        assert_eq!(
            AccessPolicy::evaluate_collection(None, false).reason(),
            Reason::NotAuthenticated
        );
        assert!(AccessPolicy::evaluate_collection(Some(&MEMBER), false).allowed());
        assert_eq!(
            AccessPolicy::evaluate_collection(Some(&MEMBER), true).reason(),
            Reason::NotAdmin
        );
        assert!(AccessPolicy::evaluate_collection(Some(&ADMIN), true).allowed());
    }
}
