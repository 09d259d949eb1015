//! Functional-boundary engine
//!
//! [`Engine`] owns the resource tree and capability registry and executes
//! [`Operation`]s against them, sequencing the lifecycle handlers and the
//! transformation walk. The service host stays on the caller's side of the
//! seam and is passed per call.

use std::collections::BTreeMap;

use rescfg_core_types::ResourceAddress;

use crate::errors::{ResourceError, Result};
use crate::lifecycle::{AddStepHandler, RemoveStepHandler, ServiceHost};
use crate::model::ResourceDescriptor;
use crate::operations::{Operation, Outcome};
use crate::ops::{CapabilityRegistry, ResourceTree};
use crate::transform::{transform, TransformationDescription};

/// Resource lifecycle engine
///
/// Handlers are stateless values constructed once here and reused for every
/// operation; there is no hidden global registry. Phase-1 operations on one
/// engine are serialized by `&mut self`.
#[derive(Debug, Default)]
pub struct Engine {
    tree: ResourceTree,
    capabilities: CapabilityRegistry,
    transformers: BTreeMap<String, TransformationDescription>,
    add: AddStepHandler,
    remove: RemoveStepHandler,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level resource type
    ///
    /// # Errors
    ///
    /// Returns `DuplicateChildType` for a duplicate top-level key.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<()> {
        self.tree.register(descriptor)
    }

    /// Register the transformation rule table for a top-level resource type
    pub fn register_transformer(
        &mut self,
        key: impl Into<String>,
        description: TransformationDescription,
    ) {
        self.transformers.insert(key.into(), description);
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// Execute one operation
    ///
    /// # Errors
    ///
    /// Propagates the failure taxonomy of the underlying handler or
    /// transformation; see [`ResourceError`].
    pub fn execute(&mut self, host: &mut dyn ServiceHost, op: Operation) -> Result<Outcome> {
        match op {
            Operation::Add { address, values } => {
                self.add
                    .execute(&mut self.tree, &mut self.capabilities, host, &address, &values)?;
                Ok(Outcome::Added(self.tree.get(&address)?.clone()))
            }
            Operation::Remove { address } => {
                let node = self.remove.execute(
                    &mut self.tree,
                    &mut self.capabilities,
                    host,
                    &address,
                )?;
                Ok(Outcome::Removed(node))
            }
            Operation::Transform { address, target } => {
                let node = self.tree.get(&address)?;
                let description = self.transformer_for(&address)?;
                let rewritten = transform(description, node, &target)?;
                Ok(Outcome::Transformed(rewritten))
            }
        }
    }

    /// Validate tree-wide invariants (dangling capabilities, unregistered
    /// child buckets)
    ///
    /// # Errors
    ///
    /// Returns the first violation; see [`crate::rules::validate`].
    pub fn validate(&self) -> Result<()> {
        crate::rules::validate(&self.tree, &self.capabilities)
    }

    fn transformer_for(&self, address: &ResourceAddress) -> Result<&TransformationDescription> {
        let key = address
            .elements()
            .first()
            .map(|e| e.key.as_str())
            .unwrap_or("");
        self.transformers
            .get(key)
            .ok_or_else(|| ResourceError::NoSuchResourceType {
                address: address.clone(),
            })
    }
}
