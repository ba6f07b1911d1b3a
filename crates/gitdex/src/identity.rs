//! Source-login to target-identity resolution.
//!
//! The mapper never sees raw GitHub logins; it asks an [`IdentityResolver`]
//! for the target-platform identity. The shipped implementation maps every
//! login to one configured surrogate id. A real login-mapping table can be
//! slotted in behind the same trait without touching mapping logic.

/// A resolved target-platform identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Target-platform user id.
    pub user_id: String,
}

/// Resolves a source-platform login to a target-platform identity.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, login: &str) -> ExternalIdentity;
}

/// Resolves every login to a single configured surrogate identity.
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    user_id: String,
}

impl PlaceholderResolver {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl IdentityResolver for PlaceholderResolver {
    fn resolve(&self, _login: &str) -> ExternalIdentity {
        ExternalIdentity {
            user_id: self.user_id.clone(),
        }
    }
}
