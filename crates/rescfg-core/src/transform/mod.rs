//! Version transformation engine
//!
//! Rewrites an outgoing resource description for a peer at an older schema
//! version: discard rules drop attributes the target cannot express, reject
//! rules fail the transformation outright, child policies prune or reject
//! whole subtrees. Every rule is gated on
//! `introduced.requires_transformation(target)` - a rule only fires when the
//! target version predates the feature it covers.
//!
//! Transformation is a pure, synchronous, recursive computation with no
//! shared mutable state; it is safe to run on any thread.

pub mod description;

pub use description::{
    AttributeRule, ChildPolicy, ChildRule, DiscardPolicy, RejectPolicy, TransformationDescription,
};

use rescfg_core_types::{ModelVersion, Value};

use crate::errors::{ResourceError, Result};
use crate::model::ResourceNode;

/// Transform `node` for a peer at `target`, returning the rewritten payload
///
/// Attribute rules for a resource are fully applied (discards first, then
/// rejects) before its children are visited, so a whole-resource rejection
/// short-circuits without touching children's own rules. The input node is
/// never mutated.
///
/// # Errors
///
/// Returns `UnsupportedAttributeForVersion` when a reject rule fires, or
/// `UnsupportedChildResourceForVersion` when a reject-if-present child
/// policy fires.
pub fn transform(
    description: &TransformationDescription,
    node: &ResourceNode,
    target: &ModelVersion,
) -> Result<ResourceNode> {
    let mut out = node.clone();

    // 1. Discards: drop matching attributes from the outgoing payload
    for rule in description.attribute_rules() {
        let Some(discard) = &rule.discard else {
            continue;
        };
        if !rule.introduced.requires_transformation(target) {
            continue;
        }
        let value = out
            .values
            .get(&rule.attribute)
            .cloned()
            .unwrap_or(Value::Undefined);
        if discard.matches(&value) {
            tracing::debug!(
                address = %out.address,
                attribute = rule.attribute,
                target = %target,
                "transformation discarded attribute"
            );
            out.values.remove(&rule.attribute);
        }
    }

    // 2. Rejects: a match is an explicit incompatibility, never a silent drop
    for rule in description.attribute_rules() {
        let Some(reject) = &rule.reject else {
            continue;
        };
        if !rule.introduced.requires_transformation(target) {
            continue;
        }
        let value = out
            .values
            .get(&rule.attribute)
            .cloned()
            .unwrap_or(Value::Undefined);
        if reject.matches(&value) {
            return Err(ResourceError::UnsupportedAttributeForVersion {
                address: out.address.clone(),
                attribute: rule.attribute.clone(),
                target: *target,
            });
        }
    }

    // 3. Child policies, pre-order
    for rule in description.child_rules() {
        match &rule.policy {
            ChildPolicy::RejectIfPresent { introduced } => {
                if introduced.requires_transformation(target) && out.has_children_of(&rule.key) {
                    return Err(ResourceError::UnsupportedChildResourceForVersion {
                        address: out.address.clone(),
                        child_type: rule.key.clone(),
                        target: *target,
                    });
                }
            }
            ChildPolicy::ApplyRecursively(child_description) => {
                if let Some(bucket) = out.children.get(&rule.key) {
                    let mut rewritten = Vec::with_capacity(bucket.len());
                    for child in bucket {
                        rewritten.push(transform(child_description, child, target)?);
                    }
                    out.children.insert(rule.key.clone(), rewritten);
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescfg_core_types::ResourceAddress;
    use std::collections::BTreeMap;

    fn v(major: u32) -> ModelVersion {
        ModelVersion::new(major, 0, 0)
    }

    fn subsystem_node(default_channel: Value) -> ResourceNode {
        let mut values = BTreeMap::new();
        values.insert("default-channel".to_string(), default_channel);
        values.insert("default-stack".to_string(), Value::from("udp"));
        ResourceNode::new(ResourceAddress::of("subsystem", "jgroups"), values)
    }

    /// The JGroups 3.0.0 edge: default-channel discarded-if-undefined and
    /// rejected-if-defined, default-stack rejected-if-undefined, channel
    /// children rejected outright.
    fn jgroups_rules() -> TransformationDescription {
        TransformationDescription::new()
            .discard_attribute("default-channel", v(3), DiscardPolicy::IfUndefined)
            .reject_attribute("default-channel", v(3), RejectPolicy::IfDefined)
            .reject_attribute("default-stack", v(3), RejectPolicy::IfUndefined)
            .reject_child("channel", v(3))
    }

    #[test]
    fn test_undefined_attribute_discarded_for_old_target() {
        let node = subsystem_node(Value::Undefined);
        let out = transform(&jgroups_rules(), &node, &v(2)).unwrap();
        assert!(!out.values.contains_key("default-channel"));
        assert_eq!(*out.value("default-stack"), Value::from("udp"));
    }

    #[test]
    fn test_defined_attribute_rejected_for_old_target() {
        let node = subsystem_node(Value::from("ee"));
        let err = transform(&jgroups_rules(), &node, &v(2)).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::UnsupportedAttributeForVersion { ref attribute, .. }
                if attribute == "default-channel"
        ));
    }

    #[test]
    fn test_new_target_needs_no_transformation() {
        let node = subsystem_node(Value::from("ee"));
        let out = transform(&jgroups_rules(), &node, &v(3)).unwrap();
        assert_eq!(out, node);
    }

    #[test]
    fn test_reject_if_undefined() {
        let mut node = subsystem_node(Value::Undefined);
        node.values.remove("default-stack");
        let err = transform(&jgroups_rules(), &node, &v(2)).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::UnsupportedAttributeForVersion { ref attribute, .. }
                if attribute == "default-stack"
        ));
    }

    #[test]
    fn test_child_rejected_when_present() {
        let mut node = subsystem_node(Value::Undefined);
        node.attach_child(ResourceNode::new(
            node.address.child("channel", "ee"),
            BTreeMap::new(),
        ));
        let err = transform(&jgroups_rules(), &node, &v(2)).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::UnsupportedChildResourceForVersion { ref child_type, .. }
                if child_type == "channel"
        ));
    }

    #[test]
    fn test_recursion_applies_child_rules() {
        let stack_rules = TransformationDescription::new().discard_attribute(
            "statistics-enabled",
            v(3),
            DiscardPolicy::IfUndefined,
        );
        let rules = TransformationDescription::new().recurse_child("stack", stack_rules);

        let mut node = subsystem_node(Value::Undefined);
        let mut stack_values = BTreeMap::new();
        stack_values.insert("statistics-enabled".to_string(), Value::Undefined);
        node.attach_child(ResourceNode::new(
            node.address.child("stack", "udp"),
            stack_values,
        ));

        let out = transform(&rules, &node, &v(2)).unwrap();
        assert!(!out.children_of("stack")[0]
            .values
            .contains_key("statistics-enabled"));
    }

    #[test]
    fn test_noop_rule_set_is_identity() {
        let node = subsystem_node(Value::from("ee"));
        let out = transform(&TransformationDescription::new(), &node, &v(1)).unwrap();
        assert_eq!(out, node);
    }
}
