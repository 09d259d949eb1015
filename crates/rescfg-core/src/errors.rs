use rescfg_core_types::{ModelVersion, ResourceAddress};
use thiserror::Error;

/// Result type alias using ResourceError
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Comprehensive error taxonomy for resource-configuration operations
///
/// Every failure carries the address and attribute/child/capability that
/// identifies the cause; nothing is reported without context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    // ===== Attribute Validation Errors =====
    /// Attribute is absent, not nullable, and has no default
    #[error("Missing required attribute '{attribute}' at {address}")]
    MissingRequiredAttribute {
        address: ResourceAddress,
        attribute: String,
    },

    /// Attribute received an expression but does not allow expressions
    #[error("Attribute '{attribute}' at {address} does not allow expressions")]
    ExpressionNotAllowed {
        address: ResourceAddress,
        attribute: String,
    },

    /// Attribute value does not conform to the declared type
    #[error("Attribute '{attribute}' at {address} expects {expected}, got {actual}")]
    TypeMismatch {
        address: ResourceAddress,
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Operation supplied an attribute the schema does not declare
    #[error("Unknown attribute '{attribute}' at {address}")]
    UnknownAttribute {
        address: ResourceAddress,
        attribute: String,
    },

    // ===== Path Errors =====
    /// A resource already exists at the target address
    #[error("Resource already exists at {address}")]
    PathAlreadyExists { address: ResourceAddress },

    /// No resource exists at the target address
    #[error("No resource at {address}")]
    NoSuchResource { address: ResourceAddress },

    /// No descriptor is registered for the final path element's type
    #[error("No resource type registered for {address}")]
    NoSuchResourceType { address: ResourceAddress },

    /// A child descriptor with the same path key but a different type is
    /// already registered under this parent
    #[error("Duplicate child type '{key}' under descriptor '{parent}'")]
    DuplicateChildType { parent: String, key: String },

    /// Schema declares two attributes with the same name
    #[error("Duplicate attribute '{attribute}' in descriptor '{key}'")]
    DuplicateAttribute { key: String, attribute: String },

    // ===== Capability Errors =====
    /// Another resource already owns the resolved capability name
    #[error("Capability '{name}' already registered by {owner}")]
    CapabilityAlreadyRegistered {
        name: String,
        owner: ResourceAddress,
    },

    /// A registered capability's owning resource no longer exists
    #[error("Capability '{name}' is owned by missing resource {owner}")]
    DanglingCapability {
        name: String,
        owner: ResourceAddress,
    },

    // ===== Runtime Phase Errors =====
    /// The service host failed to start a service
    #[error("Failed to start service '{service}' at {address}: {reason}")]
    ServiceStartFailure {
        address: ResourceAddress,
        service: String,
        reason: String,
    },

    /// The service host failed to stop a service
    #[error("Failed to stop service '{service}' at {address}: {reason}")]
    ServiceStopFailure {
        address: ResourceAddress,
        service: String,
        reason: String,
    },

    // ===== Transformation Errors =====
    /// Attribute cannot be expressed at the target version
    #[error("Attribute '{attribute}' at {address} is not supported by version {target}")]
    UnsupportedAttributeForVersion {
        address: ResourceAddress,
        attribute: String,
        target: ModelVersion,
    },

    /// Child resource type cannot be expressed at the target version
    #[error("Child resource type '{child_type}' at {address} is not supported by version {target}")]
    UnsupportedChildResourceForVersion {
        address: ResourceAddress,
        child_type: String,
        target: ModelVersion,
    },

    // ===== Tree Invariant Errors =====
    /// A child bucket exists for a type the parent descriptor never registered
    #[error("Unregistered child type '{child_type}' present under {address}")]
    UnregisteredChildType {
        address: ResourceAddress,
        child_type: String,
    },
}

impl ResourceError {
    /// Whether this failure is local to a single operation and never retried
    ///
    /// Runtime-phase failures (service start/stop) are the only retryable
    /// kind: the caller may re-issue the whole operation after phase-2
    /// rollback.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResourceError::ServiceStartFailure { .. } | ResourceError::ServiceStopFailure { .. }
        )
    }
}
