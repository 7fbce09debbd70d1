//! Resource-level authorization.
//!
//! The gate in [`crate::middleware`] only proves *who* is calling. Whether
//! that identity may touch a particular account or view is decided here,
//! at every owner-scoped call site in the services.

use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Account,
    View,
}

/// The thing being acted on, reduced to what a policy needs: its kind and
/// the account that owns it. An account owns itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub owner_id: Uuid,
}

impl Resource {
    pub fn account(account_id: Uuid) -> Self {
        Self {
            kind: ResourceKind::Account,
            owner_id: account_id,
        }
    }

    pub fn view(owner_id: Uuid) -> Self {
        Self {
            kind: ResourceKind::View,
            owner_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    List,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub trait AuthorizationPolicy: Send + Sync {
    fn authorize(&self, identity: &Identity, resource: &Resource, action: Action) -> Decision;
}

/// Any authenticated caller may act on any resource; path parameters are
/// trusted. This is the service's current contract.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustedClientPolicy;

impl AuthorizationPolicy for TrustedClientPolicy {
    fn authorize(&self, _identity: &Identity, _resource: &Resource, _action: Action) -> Decision {
        Decision::Allow
    }
}

/// Callers may only act on what they own.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerOnlyPolicy;

impl AuthorizationPolicy for OwnerOnlyPolicy {
    fn authorize(&self, identity: &Identity, resource: &Resource, _action: Action) -> Decision {
        if identity.account_id == resource.owner_id {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

pub fn enforce(
    policy: &dyn AuthorizationPolicy,
    identity: &Identity,
    resource: Resource,
    action: Action,
) -> Result<(), ApiError> {
    match policy.authorize(identity, &resource, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            warn!(
                "Account {} denied {:?} on {:?} owned by {}",
                identity.account_id, action, resource.kind, resource.owner_id
            );
            Err(ApiError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_policy_allows_foreign_resources() {
        let caller = Identity { account_id: Uuid::new_v4() };
        let foreign = Resource::view(Uuid::new_v4());
        assert_eq!(
            TrustedClientPolicy.authorize(&caller, &foreign, Action::Delete),
            Decision::Allow
        );
    }

    #[test]
    fn owner_policy_checks_ownership() {
        let caller = Identity { account_id: Uuid::new_v4() };

        let own = Resource::account(caller.account_id);
        assert_eq!(OwnerOnlyPolicy.authorize(&caller, &own, Action::Delete), Decision::Allow);

        let foreign = Resource::view(Uuid::new_v4());
        assert!(matches!(
            enforce(&OwnerOnlyPolicy, &caller, foreign, Action::Delete),
            Err(ApiError::Forbidden)
        ));
    }
}
