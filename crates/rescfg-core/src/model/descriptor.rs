use std::collections::BTreeMap;

use rescfg_core_types::{PathElement, ResourceAddress, Value};
use serde::{Deserialize, Serialize};

use crate::errors::{ResourceError, Result};

use super::attribute::AttributeDefinition;
use super::capability::Capability;
use super::service::ServiceTemplate;

/// Outcome of validating an operation's attribute map against a descriptor
///
/// `deprecated` lists the deprecated attributes the operation actually
/// supplied, for diagnostic reporting; it never affects acceptance.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedValues {
    pub values: BTreeMap<String, Value>,
    pub deprecated: Vec<String>,
}

/// Schema for one resource type: attributes, capabilities, services, children
///
/// The path-element key names the resource type under its parent; a wildcard
/// descriptor matches any instance value for that key ("singleton-policy=*"),
/// a fixed descriptor matches exactly one ("subsystem=jgroups").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    key: String,
    value: Option<String>,
    attributes: Vec<AttributeDefinition>,
    capabilities: Vec<Capability>,
    services: Vec<ServiceTemplate>,
    children: Vec<ResourceDescriptor>,
}

impl ResourceDescriptor {
    /// A descriptor matching any instance value for `key`
    pub fn wildcard(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            attributes: Vec::new(),
            capabilities: Vec::new(),
            services: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A descriptor matching exactly `key=value`
    pub fn fixed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::wildcard(key)
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_wildcard(&self) -> bool {
        self.value.is_none()
    }

    /// Whether this descriptor matches a concrete path element
    pub fn matches(&self, element: &PathElement) -> bool {
        self.key == element.key
            && self
                .value
                .as_ref()
                .map(|v| v == &element.value)
                .unwrap_or(true)
    }

    /// Add an attribute definition
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAttribute` if an attribute of the same name is
    /// already declared.
    pub fn add_attribute(mut self, attribute: AttributeDefinition) -> Result<Self> {
        if self.attributes.iter().any(|a| a.name() == attribute.name()) {
            return Err(ResourceError::DuplicateAttribute {
                key: self.key.clone(),
                attribute: attribute.name().to_string(),
            });
        }
        self.attributes.push(attribute);
        Ok(self)
    }

    pub fn add_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn add_service(mut self, service: ServiceTemplate) -> Self {
        self.services.push(service);
        self
    }

    /// Register a child resource type
    ///
    /// # Errors
    ///
    /// Returns `DuplicateChildType` if a child descriptor with the same
    /// path-element key is already registered under this descriptor.
    pub fn add_child(mut self, child: ResourceDescriptor) -> Result<Self> {
        if self.children.iter().any(|c| c.key == child.key) {
            return Err(ResourceError::DuplicateChildType {
                parent: self.key.clone(),
                key: child.key,
            });
        }
        self.children.push(child);
        Ok(self)
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn services(&self) -> &[ServiceTemplate] {
        &self.services
    }

    /// Registered child resource types, in registration order
    pub fn children(&self) -> &[ResourceDescriptor] {
        &self.children
    }

    pub fn child(&self, key: &str) -> Option<&ResourceDescriptor> {
        self.children.iter().find(|c| c.key == key)
    }

    /// Validate a full attribute map for an add operation
    ///
    /// Every schema attribute is resolved (supplied value, default, or
    /// undefined-if-nullable); attributes the schema does not declare are
    /// rejected. Deprecated attributes that were actually supplied are
    /// reported back and logged, but accepted.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` or any per-attribute validation error.
    pub fn validate_values(
        &self,
        address: &ResourceAddress,
        supplied: &BTreeMap<String, Value>,
    ) -> Result<ValidatedValues> {
        for name in supplied.keys() {
            if self.attribute(name).is_none() {
                return Err(ResourceError::UnknownAttribute {
                    address: address.clone(),
                    attribute: name.clone(),
                });
            }
        }

        let mut values = BTreeMap::new();
        let mut deprecated = Vec::new();
        for definition in &self.attributes {
            let raw = supplied
                .get(definition.name())
                .cloned()
                .unwrap_or(Value::Undefined);
            if definition.is_deprecated() && raw.is_defined() {
                tracing::warn!(
                    address = %address,
                    attribute = definition.name(),
                    since = %definition.deprecated_since().expect("deprecated attribute has a version"),
                    "operation uses deprecated attribute"
                );
                deprecated.push(definition.name().to_string());
            }
            let value = definition.validate(address, &raw)?;
            values.insert(definition.name().to_string(), value);
        }

        Ok(ValidatedValues { values, deprecated })
    }
}
