//! Caller identity resolution.
//!
//! Authentication happens upstream; by the time a request reaches the admin
//! plane its principal has been established and forwarded. This module only
//! turns that principal into an [`Owner`].

use warden_core::error::{WardenError, WardenResult};
use warden_core::models::owner::Owner;

/// What the transport knows about the caller.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub principal: Option<String>,
}

impl CallerContext {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: Some(principal.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

pub trait IdentityResolver: Send + Sync {
    fn resolve_owner(&self, caller: &CallerContext) -> WardenResult<Owner>;
}

/// Uses the forwarded principal name verbatim (trimmed) as the owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalIdentityResolver;

impl IdentityResolver for PrincipalIdentityResolver {
    fn resolve_owner(&self, caller: &CallerContext) -> WardenResult<Owner> {
        caller
            .principal
            .as_deref()
            .and_then(Owner::new)
            .ok_or(WardenError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_trimmed_principal() {
        let owner = PrincipalIdentityResolver
            .resolve_owner(&CallerContext::new("  alice "))
            .unwrap();
        assert_eq!(owner.as_str(), "alice");
    }

    #[test]
    fn missing_or_blank_principal_is_unauthenticated() {
        for caller in [CallerContext::anonymous(), CallerContext::new("   ")] {
            let err = PrincipalIdentityResolver.resolve_owner(&caller).unwrap_err();
            assert!(matches!(err, WardenError::Unauthenticated));
        }
    }
}
