use std::fmt;

use rescfg_core_types::ResourceAddress;
use serde::{Deserialize, Serialize};

/// Name of a runtime service managed by the service host
///
/// Dotted segments, e.g. "messaging.server.default.jms.manager". This engine
/// only derives and sequences names; the host owns the services themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append a segment, returning the extended name
    pub fn append(&self, segment: &str) -> Self {
        Self(format!("{}.{}", self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a service within its owning resource
///
/// On remove, secondary services stop before the primary (an associated
/// manager service goes down before the server it manages); children's
/// services stop before either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceRole {
    Primary,
    Secondary,
}

/// Declarative template from which concrete service names are derived
///
/// The resolved name is the base appended with the owning resource's
/// trailing address value, mirroring dynamic capability naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTemplate {
    base: String,
    role: ServiceRole,
}

impl ServiceTemplate {
    pub fn primary(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            role: ServiceRole::Primary,
        }
    }

    pub fn secondary(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            role: ServiceRole::Secondary,
        }
    }

    pub fn role(&self) -> ServiceRole {
        self.role
    }

    /// Concrete service name for a resource at `address`
    pub fn resolved(&self, address: &ResourceAddress) -> ServiceName {
        ServiceName::new(&self.base).append(address.last_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_name() {
        let template = ServiceTemplate::primary("messaging.server");
        let addr = ResourceAddress::of("server", "default");
        assert_eq!(template.resolved(&addr).as_str(), "messaging.server.default");
    }

    #[test]
    fn test_append() {
        let name = ServiceName::new("messaging.server").append("default").append("jms");
        assert_eq!(name.as_str(), "messaging.server.default.jms");
    }
}
