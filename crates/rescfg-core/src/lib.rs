//! rescfg Core - declarative resource lifecycle & version transformation
//!
//! This crate provides a generic configuration-resource engine:
//! - Typed attribute schemas with defaults, expression gating, and
//!   deprecation metadata
//! - Resource descriptors aggregating attributes, capabilities, services,
//!   and child resource types
//! - A mutable, addressable resource tree with descriptor registration
//! - Two-phase add/remove lifecycle handlers with asymmetric rollback
//! - A capability registry with dynamic (address-parameterized) naming
//! - A pure version-transformation engine (discard/reject/child policies)
//!
//! Schema sources, service hosts, and operation submitters are external
//! collaborators; see the `rescfg-cli` crate for a working submitter.

pub mod engine;
pub mod errors;
pub mod lifecycle;
pub mod logging_facility;
pub mod model;
pub mod operations;
pub mod ops;
pub mod rules;
pub mod transform;

// Re-export commonly used types
pub use engine::Engine;
pub use errors::{ResourceError, Result};
pub use lifecycle::{AddStepHandler, RecordingHost, RemoveStepHandler, ServiceHost};
pub use model::{
    AttributeDefinition, AttributeFlag, Capability, ResourceDescriptor, ResourceNode, ServiceName,
    ServiceRole, ServiceTemplate,
};
pub use operations::{Operation, Outcome};
pub use ops::{CapabilityRegistry, ResourceTree};
pub use rescfg_core_types::{AttrType, ModelVersion, PathElement, ResourceAddress, Value};
pub use transform::{transform, DiscardPolicy, RejectPolicy, TransformationDescription};
