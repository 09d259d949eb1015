use std::collections::BTreeMap;

use rescfg_core_types::ResourceAddress;

use crate::errors::{ResourceError, Result};
use crate::model::Capability;

/// Registry of resolved capability names and their owning resources
///
/// A capability registered by an added resource is deregistered exactly once
/// when that resource is removed. Deregistration is idempotent because
/// rollback paths may call it more than once.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    registered: BTreeMap<String, ResourceAddress>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `capability` for the resource at `owner`
    ///
    /// # Errors
    ///
    /// Returns `CapabilityAlreadyRegistered` if the resolved name is taken,
    /// carrying the current owner's address so the caller can resolve the
    /// conflict.
    pub fn register(&mut self, capability: &Capability, owner: &ResourceAddress) -> Result<String> {
        let name = capability.resolved_name(owner);
        if let Some(existing) = self.registered.get(&name) {
            return Err(ResourceError::CapabilityAlreadyRegistered {
                name,
                owner: existing.clone(),
            });
        }
        tracing::debug!(capability = %name, owner = %owner, "capability registered");
        self.registered.insert(name.clone(), owner.clone());
        Ok(name)
    }

    /// Deregister `capability` for the resource at `owner`
    ///
    /// No-op-safe if already absent. Only the owning resource's registration
    /// is removed; an unrelated owner under the same resolved name is left
    /// untouched.
    pub fn deregister(&mut self, capability: &Capability, owner: &ResourceAddress) {
        let name = capability.resolved_name(owner);
        if self.registered.get(&name) == Some(owner) {
            tracing::debug!(capability = %name, owner = %owner, "capability deregistered");
            self.registered.remove(&name);
        }
    }

    /// Whether the resolved name is currently registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains_key(name)
    }

    /// The owner of a resolved capability name, if registered
    pub fn owner(&self, name: &str) -> Option<&ResourceAddress> {
        self.registered.get(name)
    }

    /// All registrations, ordered by resolved name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceAddress)> {
        self.registered.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
