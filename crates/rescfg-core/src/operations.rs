//! Operation inventory
//!
//! Operations are the functional-boundary entry points a submitter (CLI,
//! management API) issues by path and attribute map; they are processed by
//! [`crate::engine::Engine::execute`].

use std::collections::BTreeMap;

use rescfg_core_types::{ModelVersion, ResourceAddress, Value};
use serde::{Deserialize, Serialize};

use crate::model::ResourceNode;

/// An operation against the resource tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Add a resource at `address` with the supplied attribute values
    Add {
        address: ResourceAddress,
        values: BTreeMap<String, Value>,
    },

    /// Remove the resource at `address`, cascading service stops to
    /// registered child types
    Remove { address: ResourceAddress },

    /// Rewrite the resource description at `address` for a peer at
    /// `target`
    Transform {
        address: ResourceAddress,
        target: ModelVersion,
    },
}

/// Successful operation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Snapshot of the node created by an add
    Added(ResourceNode),
    /// The detached node, children still attached
    Removed(ResourceNode),
    /// The rewritten payload of a transform
    Transformed(ResourceNode),
}

impl Outcome {
    /// The node carried by this outcome
    pub fn node(&self) -> &ResourceNode {
        match self {
            Outcome::Added(n) | Outcome::Removed(n) | Outcome::Transformed(n) => n,
        }
    }
}
