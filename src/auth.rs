//! API-key to tenant resolution.
//!
//! Keys are matched exactly; the rest of the crate only ever sees the
//! resolved [`TenantId`].

use std::collections::HashMap;

use crate::models::TenantId;

/// Mapping from caller API keys to the tenant they authenticate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    keys: HashMap<String, TenantId>,
}

impl ApiKeys {
    /// Creates an empty key set. Every lookup fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` for `tenant`, replacing any previous owner.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>, tenant: impl Into<TenantId>) -> Self {
        self.keys.insert(key.into(), tenant.into());
        self
    }

    /// Returns the tenant authenticated by `key`, if any.
    pub fn resolve(&self, key: &str) -> Option<&TenantId> {
        self.keys.get(key)
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(String, TenantId)> for ApiKeys {
    fn from_iter<I: IntoIterator<Item = (String, TenantId)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
