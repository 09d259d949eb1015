//! Tree and registry operations

pub mod capability_registry;
pub mod tree;

pub use capability_registry::CapabilityRegistry;
pub use tree::ResourceTree;
