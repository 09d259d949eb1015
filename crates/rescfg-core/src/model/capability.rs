use rescfg_core_types::ResourceAddress;
use serde::{Deserialize, Serialize};

/// A named contract a resource instance provides to other resources
///
/// Dynamic capabilities derive their registered name from the owning
/// resource's address; static capabilities register under the base name
/// directly. `service_type` is a label for the runtime type the capability
/// exposes, used only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    base_name: String,
    service_type: String,
    dynamic: bool,
}

impl Capability {
    /// A capability whose registered name is parameterized by the owning
    /// resource's trailing address value
    pub fn dynamic(base_name: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            service_type: service_type.into(),
            dynamic: true,
        }
    }

    /// A capability registered under its base name, one instance per tree
    pub fn fixed(base_name: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            service_type: service_type.into(),
            dynamic: false,
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// The concrete name this capability registers under for a resource at
    /// `address`
    ///
    /// Pure function of the base name and the address's trailing path-element
    /// value; no side effects.
    pub fn resolved_name(&self, address: &ResourceAddress) -> String {
        if self.dynamic {
            format!("{}.{}", self.base_name, address.last_value())
        } else {
            self.base_name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_resolution() {
        let cap = Capability::dynamic("org.wildfly.clustering.singleton.policy", "SingletonPolicy");
        let addr = ResourceAddress::of("singleton-policy", "default");
        assert_eq!(
            cap.resolved_name(&addr),
            "org.wildfly.clustering.singleton.policy.default"
        );
    }

    #[test]
    fn test_fixed_resolution_ignores_address() {
        let cap = Capability::fixed("org.wildfly.messaging", "MessagingSubsystem");
        let a = ResourceAddress::of("subsystem", "messaging");
        let b = ResourceAddress::of("subsystem", "other");
        assert_eq!(cap.resolved_name(&a), cap.resolved_name(&b));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let cap = Capability::dynamic("cap", "T");
        let addr = ResourceAddress::of("server", "a");
        assert_eq!(cap.resolved_name(&addr), cap.resolved_name(&addr));
    }
}
