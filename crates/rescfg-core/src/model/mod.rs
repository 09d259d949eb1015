//! Domain models: attribute schema, capabilities, services, descriptors,
//! and concrete resource nodes

pub mod attribute;
pub mod capability;
pub mod descriptor;
pub mod resource;
pub mod service;

pub use attribute::{AttributeDefinition, AttributeDefinitionBuilder, AttributeFlag};
pub use capability::Capability;
pub use descriptor::{ResourceDescriptor, ValidatedValues};
pub use resource::ResourceNode;
pub use service::{ServiceName, ServiceRole, ServiceTemplate};
