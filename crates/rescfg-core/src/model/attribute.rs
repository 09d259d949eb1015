use std::collections::BTreeSet;

use rescfg_core_types::{AttrType, ModelVersion, ResourceAddress, Value};
use serde::{Deserialize, Serialize};

use crate::errors::{ResourceError, Result};

/// Behavioral flags attached to an attribute definition
///
/// Flags do not affect validation; they tell the host what a later change
/// to the attribute requires at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeFlag {
    /// Changing this attribute requires restarting the resource's services
    RestartResourceServices,
    /// Changing this attribute requires restarting all services
    RestartAllServices,
    /// Changing this attribute requires a full reload
    RestartJvm,
}

/// Typed, named configuration field of a resource type
///
/// Definitions are built once at schema-registration time through
/// [`AttributeDefinition::build`] and looked up by name afterwards; they are
/// plain data, no dynamic dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    name: String,
    attr_type: AttrType,
    allow_null: bool,
    allow_expression: bool,
    default_value: Option<Value>,
    deprecated_since: Option<ModelVersion>,
    flags: BTreeSet<AttributeFlag>,
    xml_name: Option<String>,
}

impl AttributeDefinition {
    /// Start building a definition with the given name and declared type
    pub fn build(name: impl Into<String>, attr_type: AttrType) -> AttributeDefinitionBuilder {
        AttributeDefinitionBuilder {
            definition: AttributeDefinition {
                name: name.into(),
                attr_type,
                allow_null: false,
                allow_expression: false,
                default_value: None,
                deprecated_since: None,
                flags: BTreeSet::new(),
                xml_name: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr_type(&self) -> AttrType {
        self.attr_type
    }

    pub fn allow_null(&self) -> bool {
        self.allow_null
    }

    pub fn allow_expression(&self) -> bool {
        self.allow_expression
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// The version this attribute was deprecated in, if any
    pub fn deprecated_since(&self) -> Option<&ModelVersion> {
        self.deprecated_since.as_ref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated_since.is_some()
    }

    pub fn flags(&self) -> &BTreeSet<AttributeFlag> {
        &self.flags
    }

    /// XML-serialization alias, falling back to the attribute name
    pub fn xml_name(&self) -> &str {
        self.xml_name.as_deref().unwrap_or(&self.name)
    }

    /// Validate a supplied value against this definition
    ///
    /// Returns the effective typed value:
    /// - an undefined input resolves to the default when one is declared,
    ///   stays undefined when the attribute is nullable, and fails with
    ///   `MissingRequiredAttribute` otherwise
    /// - an expression passes through untouched when `allow_expression` is
    ///   set and fails with `ExpressionNotAllowed` otherwise (expressions are
    ///   evaluated by the host, never here)
    /// - a literal must conform to the declared type
    ///
    /// Deprecation does not change acceptance; callers consult
    /// [`Self::is_deprecated`] for diagnostic reporting.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredAttribute`, `ExpressionNotAllowed`, or
    /// `TypeMismatch` as described above.
    pub fn validate(&self, address: &ResourceAddress, supplied: &Value) -> Result<Value> {
        match supplied {
            Value::Undefined => {
                if let Some(default) = &self.default_value {
                    return Ok(default.clone());
                }
                if self.allow_null {
                    return Ok(Value::Undefined);
                }
                Err(ResourceError::MissingRequiredAttribute {
                    address: address.clone(),
                    attribute: self.name.clone(),
                })
            }
            Value::Expression(_) => {
                if !self.allow_expression {
                    return Err(ResourceError::ExpressionNotAllowed {
                        address: address.clone(),
                        attribute: self.name.clone(),
                    });
                }
                Ok(supplied.clone())
            }
            literal => match literal.attr_type() {
                Some(actual) if actual == self.attr_type => Ok(literal.clone()),
                other => Err(ResourceError::TypeMismatch {
                    address: address.clone(),
                    attribute: self.name.clone(),
                    expected: self.attr_type.to_string(),
                    actual: other
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "UNDEFINED".to_string()),
                }),
            },
        }
    }
}

/// Builder for [`AttributeDefinition`]
#[derive(Debug, Clone)]
pub struct AttributeDefinitionBuilder {
    definition: AttributeDefinition,
}

impl AttributeDefinitionBuilder {
    pub fn allow_null(mut self, allow: bool) -> Self {
        self.definition.allow_null = allow;
        self
    }

    pub fn allow_expression(mut self, allow: bool) -> Self {
        self.definition.allow_expression = allow;
        self
    }

    /// Set the default value; also makes the attribute nullable, matching
    /// the schema invariant that a defaulted attribute never needs to be
    /// supplied
    pub fn default_value(mut self, value: Value) -> Self {
        self.definition.allow_null = true;
        self.definition.default_value = Some(value);
        self
    }

    pub fn deprecated(mut self, since: ModelVersion) -> Self {
        self.definition.deprecated_since = Some(since);
        self
    }

    pub fn flag(mut self, flag: AttributeFlag) -> Self {
        self.definition.flags.insert(flag);
        self
    }

    pub fn xml_name(mut self, name: impl Into<String>) -> Self {
        self.definition.xml_name = Some(name.into());
        self
    }

    pub fn finish(self) -> AttributeDefinition {
        self.definition
    }
}
