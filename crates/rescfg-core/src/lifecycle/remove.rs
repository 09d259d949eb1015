use rescfg_core_types::ResourceAddress;

use crate::errors::{ResourceError, Result};
use crate::model::{ResourceDescriptor, ResourceNode, ServiceName, ServiceRole};
use crate::ops::{CapabilityRegistry, ResourceTree};

use super::service_host::ServiceHost;

/// Two-phase remove handler
///
/// Phase 1 deregisters every capability this resource type is known to
/// register and detaches the node (children stay attached to it). Phase 2
/// stops services leaves-first: for every child type *registered on the
/// descriptor*, each child's services (recursively, grandchildren first),
/// then this resource's secondary services, then its primary - dependents
/// before the services they depend on.
///
/// The child-type set is the descriptor's registered set, not a
/// hand-maintained list, so a newly added child type is cascaded
/// automatically. A child bucket present in the tree under an unregistered
/// type key is skipped: its services are never stopped. `rules::validation`
/// flags such buckets.
///
/// On phase-2 failure the node is restored and capabilities re-registered
/// so the whole remove can be retried; services already stopped stay
/// stopped (best-effort, mirroring the upstream no-op recovery).
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveStepHandler;

impl RemoveStepHandler {
    pub fn new() -> Self {
        Self
    }

    /// Execute a remove operation at `address`
    ///
    /// Returns the detached node on success.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResource` / `NoSuchResourceType` with the model
    /// untouched, or `ServiceStopFailure` with the model phase restored.
    pub fn execute(
        &self,
        tree: &mut ResourceTree,
        capabilities: &mut CapabilityRegistry,
        host: &mut dyn ServiceHost,
        address: &ResourceAddress,
    ) -> Result<ResourceNode> {
        let descriptor = tree.descriptor_for(address)?.clone();

        // Phase 1: deregister capabilities, then detach the node
        for capability in descriptor.capabilities() {
            capabilities.deregister(capability, address);
        }
        let node = tree.remove_resource(address)?;
        tracing::debug!(address = %address, "remove: model phase committed");

        // Phase 2: stop services, leaves first
        let mut plan: Vec<ServiceName> = Vec::new();
        collect_stop_plan(&descriptor, &node, &mut plan);

        for name in &plan {
            if let Err(reason) = host.stop(name) {
                let err = ResourceError::ServiceStopFailure {
                    address: address.clone(),
                    service: name.as_str().to_string(),
                    reason,
                };
                self.rollback_model(tree, capabilities, &descriptor, node);
                return Err(err);
            }
        }

        tracing::debug!(address = %address, "remove: runtime phase committed");
        Ok(node)
    }

    /// Restore the model phase so the whole remove can be retried
    ///
    /// Best-effort: restore failures are logged and swallowed; services
    /// already stopped are not restarted.
    fn rollback_model(
        &self,
        tree: &mut ResourceTree,
        capabilities: &mut CapabilityRegistry,
        descriptor: &ResourceDescriptor,
        node: ResourceNode,
    ) {
        let address = node.address.clone();
        for capability in descriptor.capabilities() {
            if let Err(err) = capabilities.register(capability, &address) {
                tracing::warn!(
                    address = %address,
                    error = %err,
                    "remove rollback: failed to re-register capability"
                );
            }
        }
        if let Err(err) = tree.restore_resource(node) {
            tracing::warn!(
                address = %address,
                error = %err,
                "remove rollback: failed to restore resource"
            );
        }
        tracing::debug!(address = %address, "remove: model phase rolled back");
    }
}

/// Accumulate the stop order for `node`: registered child types first
/// (recursively, in registration order, insertion order within a bucket),
/// then the node's own secondary services, then its primary services
fn collect_stop_plan(
    descriptor: &ResourceDescriptor,
    node: &ResourceNode,
    plan: &mut Vec<ServiceName>,
) {
    for child_descriptor in descriptor.children() {
        for child in node.children_of(child_descriptor.key()) {
            collect_stop_plan(child_descriptor, child, plan);
        }
    }
    for role in [ServiceRole::Secondary, ServiceRole::Primary] {
        for template in descriptor.services() {
            if template.role() == role {
                plan.push(template.resolved(&node.address));
            }
        }
    }
}
