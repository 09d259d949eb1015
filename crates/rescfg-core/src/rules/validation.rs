use crate::errors::{ResourceError, Result};
use crate::model::{ResourceDescriptor, ResourceNode};
use crate::ops::{CapabilityRegistry, ResourceTree};

/// Validate tree-wide invariants
///
/// Checks, in order:
/// 1. No dangling capability: every registered capability's owning resource
///    still exists in the tree.
/// 2. No unregistered child bucket: every child bucket in the tree is backed
///    by a child type registered on the governing descriptor. Such buckets
///    are skipped by the remove cascade, so their services would leak.
///
/// Returns the first violation encountered.
///
/// # Errors
///
/// Returns `DanglingCapability` or `UnregisteredChildType`.
pub fn validate(tree: &ResourceTree, capabilities: &CapabilityRegistry) -> Result<()> {
    for (name, owner) in capabilities.iter() {
        if tree.find(owner).is_none() {
            return Err(ResourceError::DanglingCapability {
                name: name.to_string(),
                owner: owner.clone(),
            });
        }
    }

    for descriptor in tree.descriptors() {
        let key = descriptor.key();
        for node in tree.root().children_of(key) {
            check_buckets(descriptor, node)?;
        }
    }

    Ok(())
}

fn check_buckets(descriptor: &ResourceDescriptor, node: &ResourceNode) -> Result<()> {
    for (key, bucket) in &node.children {
        let Some(child_descriptor) = descriptor.child(key) else {
            return Err(ResourceError::UnregisteredChildType {
                address: node.address.clone(),
                child_type: key.clone(),
            });
        };
        for child in bucket {
            check_buckets(child_descriptor, child)?;
        }
    }
    Ok(())
}
