use std::collections::BTreeMap;

use rescfg_core_types::{ResourceAddress, Value};

use crate::errors::{ResourceError, Result};
use crate::model::{Capability, ServiceName, ServiceRole};
use crate::ops::{CapabilityRegistry, ResourceTree};

use super::service_host::ServiceHost;

/// Two-phase add handler
///
/// Phase 1 validates the attribute map against the schema and persists the
/// node. A capability resolution pass then runs: a conflict vetoes the whole
/// operation atomically (the persisted node is taken back out). Phase 2
/// starts the resource's services and registers its capabilities; on
/// phase-2 failure only phase-2 side effects are rolled back, order-reversed
/// and idempotent - the model phase stays committed so the caller can retry
/// phase 2 against it.
///
/// Handlers are stateless; construct one per tree and pass it wherever a
/// descriptor needs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddStepHandler;

impl AddStepHandler {
    pub fn new() -> Self {
        Self
    }

    /// Execute an add operation at `address`
    ///
    /// # Errors
    ///
    /// Returns validation/path errors with the model untouched,
    /// `CapabilityAlreadyRegistered` with the model rolled back, or
    /// `ServiceStartFailure` with phase-2 effects rolled back and the model
    /// committed.
    pub fn execute(
        &self,
        tree: &mut ResourceTree,
        capabilities: &mut CapabilityRegistry,
        host: &mut dyn ServiceHost,
        address: &ResourceAddress,
        supplied: &BTreeMap<String, Value>,
    ) -> Result<()> {
        // Phase 1: validate and persist the model
        tree.add_resource(address, supplied)?;
        tracing::debug!(address = %address, "add: model phase committed");

        let descriptor = tree.descriptor_for(address)?;
        let caps: Vec<Capability> = descriptor.capabilities().to_vec();
        let services: Vec<(ServiceName, ServiceRole)> = descriptor
            .services()
            .iter()
            .map(|t| (t.resolved(address), t.role()))
            .collect();

        // Capability resolution pass: a conflict vetoes the whole operation
        // before any phase-2 work begins, including the model phase.
        for capability in &caps {
            let name = capability.resolved_name(address);
            if let Some(owner) = capabilities.owner(&name).cloned() {
                tree.remove_resource(address)?;
                return Err(ResourceError::CapabilityAlreadyRegistered { name, owner });
            }
        }

        // Phase 2: start services (primary before secondary), then register
        // capabilities, tracking effects for order-reversed rollback.
        let parameters = tree.get(address)?.values.clone();
        let mut started: Vec<ServiceName> = Vec::new();

        let mut ordered = services;
        ordered.sort_by_key(|(_, role)| match role {
            ServiceRole::Primary => 0,
            ServiceRole::Secondary => 1,
        });

        for (name, _) in &ordered {
            if let Err(reason) = host.start(name, address, &parameters) {
                let err = ResourceError::ServiceStartFailure {
                    address: address.clone(),
                    service: name.as_str().to_string(),
                    reason,
                };
                self.rollback_runtime(capabilities, host, address, &[], &started);
                return Err(err);
            }
            started.push(name.clone());
        }

        let mut registered: Vec<Capability> = Vec::new();
        for capability in &caps {
            match capabilities.register(capability, address) {
                Ok(_) => registered.push(capability.clone()),
                Err(err) => {
                    // Raced only in the sense of a veto pass bug; treat the
                    // same as any phase-2 failure.
                    self.rollback_runtime(capabilities, host, address, &registered, &started);
                    return Err(err);
                }
            }
        }

        tracing::debug!(address = %address, "add: runtime phase committed");
        Ok(())
    }

    /// Roll back phase-2 effects already performed, in reverse order
    ///
    /// Best-effort: a stop that fails during rollback is logged and
    /// swallowed. Deregistration is idempotent, so re-entry is safe.
    fn rollback_runtime(
        &self,
        capabilities: &mut CapabilityRegistry,
        host: &mut dyn ServiceHost,
        address: &ResourceAddress,
        registered: &[Capability],
        started: &[ServiceName],
    ) {
        for capability in registered.iter().rev() {
            capabilities.deregister(capability, address);
        }
        for name in started.iter().rev() {
            if let Err(reason) = host.stop(name) {
                tracing::warn!(
                    address = %address,
                    service = name.as_str(),
                    reason,
                    "add rollback: failed to stop partially-started service"
                );
            }
        }
        tracing::debug!(address = %address, "add: runtime phase rolled back");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::service_host::RecordingHost;
    use crate::model::{AttributeDefinition, ResourceDescriptor, ServiceTemplate};
    use rescfg_core_types::AttrType;

    fn server_tree() -> ResourceTree {
        let descriptor = ResourceDescriptor::wildcard("server")
            .add_attribute(
                AttributeDefinition::build("persistence-enabled", AttrType::Boolean)
                    .default_value(Value::Boolean(true))
                    .finish(),
            )
            .unwrap()
            .add_capability(Capability::dynamic("org.wildfly.messaging.server", "Server"))
            .add_service(ServiceTemplate::primary("messaging.server"))
            .add_service(ServiceTemplate::secondary("messaging.server.manager"));
        let mut tree = ResourceTree::new();
        tree.register(descriptor).unwrap();
        tree
    }

    #[test]
    fn test_add_starts_services_and_registers_capability() {
        let mut tree = server_tree();
        let mut caps = CapabilityRegistry::new();
        let mut host = RecordingHost::new();
        let address = ResourceAddress::of("server", "default");

        AddStepHandler::new()
            .execute(&mut tree, &mut caps, &mut host, &address, &BTreeMap::new())
            .unwrap();

        assert_eq!(
            host.started(),
            vec!["messaging.server.default", "messaging.server.manager.default"]
        );
        assert!(caps.is_registered("org.wildfly.messaging.server.default"));
        assert!(tree.get(&address).is_ok());
    }

    #[test]
    fn test_capability_conflict_vetoes_model_phase() {
        let mut tree = server_tree();
        let mut caps = CapabilityRegistry::new();
        let mut host = RecordingHost::new();

        // Another resource whose trailing address value is also "default"
        // already owns the resolved name.
        let cap = Capability::dynamic("org.wildfly.messaging.server", "Server");
        let other_owner = ResourceAddress::of("backup-server", "default");
        caps.register(&cap, &other_owner).unwrap();

        let address = ResourceAddress::of("server", "default");
        let result = AddStepHandler::new().execute(
            &mut tree,
            &mut caps,
            &mut host,
            &address,
            &BTreeMap::new(),
        );
        assert!(matches!(
            result,
            Err(ResourceError::CapabilityAlreadyRegistered { .. })
        ));
        // Vetoed atomically: no node persisted, no phase-2 work performed
        assert!(tree.get(&address).is_err());
        assert!(host.events.is_empty());
    }

    #[test]
    fn test_start_failure_rolls_back_runtime_only() {
        let mut tree = server_tree();
        let mut caps = CapabilityRegistry::new();
        let mut host = RecordingHost::new();
        host.fail_start_of("messaging.server.manager.default");
        let address = ResourceAddress::of("server", "default");

        let result = AddStepHandler::new().execute(
            &mut tree,
            &mut caps,
            &mut host,
            &address,
            &BTreeMap::new(),
        );
        assert!(matches!(result, Err(ResourceError::ServiceStartFailure { .. })));

        // Started services were stopped again, in reverse order
        assert_eq!(host.started(), vec!["messaging.server.default"]);
        assert_eq!(host.stopped(), vec!["messaging.server.default"]);
        // No capability left behind
        assert!(caps.is_empty());
        // Model phase deliberately stays committed
        assert!(tree.get(&address).is_ok());
    }

    #[test]
    fn test_validation_failure_leaves_model_untouched() {
        let mut tree = server_tree();
        let mut caps = CapabilityRegistry::new();
        let mut host = RecordingHost::new();
        let address = ResourceAddress::of("server", "default");

        let mut supplied = BTreeMap::new();
        supplied.insert("persistence-enabled".to_string(), Value::from("yes"));
        let result = AddStepHandler::new().execute(
            &mut tree,
            &mut caps,
            &mut host,
            &address,
            &supplied,
        );
        assert!(matches!(result, Err(ResourceError::TypeMismatch { .. })));
        assert!(tree.get(&address).is_err());
        assert!(host.events.is_empty());
    }
}
