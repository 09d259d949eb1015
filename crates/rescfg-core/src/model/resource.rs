use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rescfg_core_types::{ResourceAddress, Value};
use serde::{Deserialize, Serialize};

/// A concrete resource instance in the tree
///
/// Created by a successful add operation, detached (with its children still
/// attached to it) by a successful remove. Child nodes are bucketed by their
/// path-element key; insertion order within a bucket is preserved because
/// operational history order may matter for some resource kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Full address of this node from the root
    pub address: ResourceAddress,

    /// Effective attribute values (post-validation, defaults applied)
    pub values: BTreeMap<String, Value>,

    /// Child nodes bucketed by child-type key, insertion order preserved
    pub children: BTreeMap<String, Vec<ResourceNode>>,

    /// Timestamp when this node was created
    pub created_at: DateTime<Utc>,
}

impl ResourceNode {
    pub fn new(address: ResourceAddress, values: BTreeMap<String, Value>) -> Self {
        Self {
            address,
            values,
            children: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// The child-type key of this node ("" at the root)
    pub fn type_key(&self) -> &str {
        self.address.last().map(|e| e.key.as_str()).unwrap_or("")
    }

    /// The instance name of this node ("" at the root)
    pub fn name(&self) -> &str {
        self.address.last_value()
    }

    /// Effective value of an attribute; `Undefined` if not present
    pub fn value(&self, attribute: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        self.values.get(attribute).unwrap_or(&UNDEFINED)
    }

    /// Children of one type, in insertion order
    pub fn children_of(&self, key: &str) -> &[ResourceNode] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any child of the given type exists
    pub fn has_children_of(&self, key: &str) -> bool {
        !self.children_of(key).is_empty()
    }

    /// Attach a child node under its type bucket, preserving insertion order
    pub fn attach_child(&mut self, child: ResourceNode) {
        self.children
            .entry(child.type_key().to_string())
            .or_default()
            .push(child);
    }

    /// Detach the child named `name` from the `key` bucket, if present
    pub fn detach_child(&mut self, key: &str, name: &str) -> Option<ResourceNode> {
        let bucket = self.children.get_mut(key)?;
        let index = bucket.iter().position(|c| c.name() == name)?;
        let child = bucket.remove(index);
        if bucket.is_empty() {
            self.children.remove(key);
        }
        Some(child)
    }

    /// Find a direct child by type key and instance name
    pub fn find_child(&self, key: &str, name: &str) -> Option<&ResourceNode> {
        self.children_of(key).iter().find(|c| c.name() == name)
    }

    pub fn find_child_mut(&mut self, key: &str, name: &str) -> Option<&mut ResourceNode> {
        self.children
            .get_mut(key)?
            .iter_mut()
            .find(|c| c.name() == name)
    }
}
