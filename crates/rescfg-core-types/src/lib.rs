//! Core value types for the rescfg resource-configuration engine
//!
//! This crate holds the small, dependency-light types shared by every other
//! crate in the workspace:
//! - `ModelVersion` - totally ordered schema version (major.minor.micro)
//! - `PathElement` / `ResourceAddress` - addressing of resources in the tree
//! - `Value` / `AttrType` - typed attribute values, including deferred
//!   expressions and the explicit `Undefined` state

pub mod address;
pub mod value;
pub mod version;

pub use address::{PathElement, ResourceAddress};
pub use value::{AttrType, Value};
pub use version::ModelVersion;
