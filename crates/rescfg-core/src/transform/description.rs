use rescfg_core_types::{ModelVersion, Value};
use serde::{Deserialize, Serialize};

/// Predicate deciding whether an attribute is silently dropped from an
/// outgoing payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiscardPolicy {
    /// Always drop
    Always,
    /// Drop when the value is undefined
    IfUndefined,
    /// Drop when the value equals the given default
    IfEqualsDefault(Value),
}

impl DiscardPolicy {
    /// Whether `value` should be dropped under this policy
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            DiscardPolicy::Always => true,
            DiscardPolicy::IfUndefined => !value.is_defined(),
            DiscardPolicy::IfEqualsDefault(default) => value == default,
        }
    }
}

/// Predicate deciding whether an attribute makes the whole transformation
/// fail
///
/// Rejection surfaces as an explicit incompatibility rather than a silent
/// drop: silently dropping a semantically required attribute could change
/// runtime behavior for the older peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectPolicy {
    /// The target version cannot express this attribute at all
    IfDefined,
    /// The target version requires this attribute to be present
    IfUndefined,
}

impl RejectPolicy {
    /// Whether `value` triggers rejection under this policy
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            RejectPolicy::IfDefined => value.is_defined(),
            RejectPolicy::IfUndefined => !value.is_defined(),
        }
    }
}

/// Per-attribute transformation rule, gated by the version that introduced
/// the incompatibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRule {
    pub attribute: String,
    pub introduced: ModelVersion,
    pub discard: Option<DiscardPolicy>,
    pub reject: Option<RejectPolicy>,
}

/// Policy for a child resource type when crossing a version edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChildPolicy {
    /// The target version has no notion of this child type: fail if any
    /// instance exists. Gated by the child type's introduction version.
    RejectIfPresent { introduced: ModelVersion },
    /// Recurse into each child with its own description; the nested rules
    /// carry their own version gates
    ApplyRecursively(Box<TransformationDescription>),
}

/// Per-child-type rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRule {
    pub key: String,
    pub policy: ChildPolicy,
}

/// The complete rule table for one resource type
///
/// Built once per version edge from the schema source; applying it is a
/// pure computation (see [`super::transform`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformationDescription {
    pub(crate) attributes: Vec<AttributeRule>,
    pub(crate) children: Vec<ChildRule>,
}

impl TransformationDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a discard rule for `attribute`
    pub fn discard_attribute(
        mut self,
        attribute: impl Into<String>,
        introduced: ModelVersion,
        policy: DiscardPolicy,
    ) -> Self {
        self.attributes.push(AttributeRule {
            attribute: attribute.into(),
            introduced,
            discard: Some(policy),
            reject: None,
        });
        self
    }

    /// Add a reject rule for `attribute`
    pub fn reject_attribute(
        mut self,
        attribute: impl Into<String>,
        introduced: ModelVersion,
        policy: RejectPolicy,
    ) -> Self {
        self.attributes.push(AttributeRule {
            attribute: attribute.into(),
            introduced,
            discard: None,
            reject: Some(policy),
        });
        self
    }

    /// Reject the whole payload if any child of `key` exists and the target
    /// predates `introduced`
    pub fn reject_child(mut self, key: impl Into<String>, introduced: ModelVersion) -> Self {
        self.children.push(ChildRule {
            key: key.into(),
            policy: ChildPolicy::RejectIfPresent { introduced },
        });
        self
    }

    /// Recurse into children of `key` with their own description
    pub fn recurse_child(
        mut self,
        key: impl Into<String>,
        description: TransformationDescription,
    ) -> Self {
        self.children.push(ChildRule {
            key: key.into(),
            policy: ChildPolicy::ApplyRecursively(Box::new(description)),
        });
        self
    }

    pub fn attribute_rules(&self) -> &[AttributeRule] {
        &self.attributes
    }

    pub fn child_rules(&self) -> &[ChildRule] {
        &self.children
    }
}
