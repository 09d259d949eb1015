use std::collections::BTreeMap;

use rescfg_core_types::{ResourceAddress, Value};

use crate::errors::{ResourceError, Result};
use crate::model::{ResourceDescriptor, ResourceNode};

/// The mutable, addressable hierarchy of resource instances
///
/// Holds both the registered schema (descriptors, wired transitively with
/// their children at registration time) and the live nodes. All mutations
/// run under the caller's single-writer discipline; the tree itself carries
/// no locking.
#[derive(Debug, Clone)]
pub struct ResourceTree {
    root: ResourceNode,
    descriptors: Vec<ResourceDescriptor>,
}

impl Default for ResourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTree {
    /// Create an empty tree with no registered resource types
    pub fn new() -> Self {
        Self {
            root: ResourceNode::new(ResourceAddress::root(), BTreeMap::new()),
            descriptors: Vec::new(),
        }
    }

    /// Register a top-level resource type
    ///
    /// The descriptor's child descriptors are wired transitively by
    /// construction (pre-order: a child type is registered before any
    /// operation can target it).
    ///
    /// # Errors
    ///
    /// Returns `DuplicateChildType` if a top-level descriptor with the same
    /// path key is already registered.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<()> {
        if self.descriptors.iter().any(|d| d.key() == descriptor.key()) {
            return Err(ResourceError::DuplicateChildType {
                parent: String::new(),
                key: descriptor.key().to_string(),
            });
        }
        tracing::debug!(key = descriptor.key(), "registered resource type");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Registered top-level resource types, in registration order
    pub fn descriptors(&self) -> &[ResourceDescriptor] {
        &self.descriptors
    }

    /// Resolve the descriptor governing `address`
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResourceType` if any element of the address has no
    /// matching registered descriptor.
    pub fn descriptor_for(&self, address: &ResourceAddress) -> Result<&ResourceDescriptor> {
        let mut elements = address.elements().iter();
        let first = elements.next().ok_or_else(|| {
            ResourceError::NoSuchResourceType {
                address: address.clone(),
            }
        })?;

        let mut descriptor = self
            .descriptors
            .iter()
            .find(|d| d.matches(first))
            .ok_or_else(|| ResourceError::NoSuchResourceType {
                address: address.clone(),
            })?;

        for element in elements {
            descriptor = descriptor
                .children()
                .iter()
                .find(|d| d.matches(element))
                .ok_or_else(|| ResourceError::NoSuchResourceType {
                    address: address.clone(),
                })?;
        }

        Ok(descriptor)
    }

    /// Look up a node by address; None at a missing path
    pub fn find(&self, address: &ResourceAddress) -> Option<&ResourceNode> {
        let mut node = &self.root;
        for element in address.elements() {
            node = node.find_child(&element.key, &element.value)?;
        }
        Some(node)
    }

    fn find_mut(&mut self, address: &ResourceAddress) -> Option<&mut ResourceNode> {
        let mut node = &mut self.root;
        for element in address.elements() {
            node = node.find_child_mut(&element.key, &element.value)?;
        }
        Some(node)
    }

    /// Look up a node by address
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResource` if no node exists at `address`.
    pub fn get(&self, address: &ResourceAddress) -> Result<&ResourceNode> {
        self.find(address)
            .ok_or_else(|| ResourceError::NoSuchResource {
                address: address.clone(),
            })
    }

    /// Validate attribute values and insert a new node at `address`
    ///
    /// The effective values (defaults applied) are persisted on the node.
    /// The parent resource must already exist.
    ///
    /// # Errors
    ///
    /// Returns `PathAlreadyExists`, `NoSuchResourceType`, `NoSuchResource`
    /// (missing parent), or an attribute validation error.
    pub fn add_resource(
        &mut self,
        address: &ResourceAddress,
        supplied: &BTreeMap<String, Value>,
    ) -> Result<&ResourceNode> {
        if self.find(address).is_some() {
            return Err(ResourceError::PathAlreadyExists {
                address: address.clone(),
            });
        }

        let descriptor = self.descriptor_for(address)?;
        let validated = descriptor.validate_values(address, supplied)?;

        let parent_address = address.parent().ok_or_else(|| {
            ResourceError::NoSuchResourceType {
                address: address.clone(),
            }
        })?;
        let parent = self
            .find_mut(&parent_address)
            .ok_or_else(|| ResourceError::NoSuchResource {
                address: parent_address.clone(),
            })?;

        let node = ResourceNode::new(address.clone(), validated.values);
        parent.attach_child(node);
        tracing::debug!(address = %address, "resource added");

        self.get(address)
    }

    /// Detach and return the node at `address`
    ///
    /// Children remain attached to the returned node for the caller to
    /// process; they are not auto-discarded.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResource` if no node exists at `address`.
    pub fn remove_resource(&mut self, address: &ResourceAddress) -> Result<ResourceNode> {
        let (parent_address, element) = match (address.parent(), address.last()) {
            (Some(parent), Some(last)) => (parent, last.clone()),
            _ => {
                return Err(ResourceError::NoSuchResource {
                    address: address.clone(),
                })
            }
        };

        let parent = self
            .find_mut(&parent_address)
            .ok_or_else(|| ResourceError::NoSuchResource {
                address: address.clone(),
            })?;

        let node = parent
            .detach_child(&element.key, &element.value)
            .ok_or_else(|| ResourceError::NoSuchResource {
                address: address.clone(),
            })?;
        tracing::debug!(address = %address, "resource removed");
        Ok(node)
    }

    /// Re-attach a previously detached node at its own address
    ///
    /// Used by the remove handler to restore the model phase when the
    /// runtime phase fails.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResource` if the parent no longer exists, or
    /// `PathAlreadyExists` if the address was re-occupied.
    pub fn restore_resource(&mut self, node: ResourceNode) -> Result<()> {
        if self.find(&node.address).is_some() {
            return Err(ResourceError::PathAlreadyExists {
                address: node.address.clone(),
            });
        }
        let parent_address =
            node.address
                .parent()
                .ok_or_else(|| ResourceError::NoSuchResource {
                    address: node.address.clone(),
                })?;
        let parent = self
            .find_mut(&parent_address)
            .ok_or_else(|| ResourceError::NoSuchResource {
                address: parent_address.clone(),
            })?;
        parent.attach_child(node);
        Ok(())
    }

    /// The root node (never removable, carries no attributes)
    pub fn root(&self) -> &ResourceNode {
        &self.root
    }

    /// Mutable access to the root node, for test setup of irregular trees
    pub fn root_mut(&mut self) -> &mut ResourceNode {
        &mut self.root
    }
}
