//! Demo schema
//!
//! A small but realistic registration set: a fixed `subsystem=jgroups`
//! descriptor with version transformation rules, and a wildcard
//! `singleton-policy` descriptor with a dynamic capability and an attached
//! runtime service.

use rescfg_core::{
    AttrType, AttributeDefinition, Capability, DiscardPolicy, Engine, ModelVersion, RejectPolicy,
    ResourceDescriptor, Result, ServiceTemplate, TransformationDescription, Value,
};

const CURRENT: ModelVersion = ModelVersion::new(3, 0, 0);

/// Build the demo engine: descriptors plus transformation rules
pub fn demo_engine() -> Result<Engine> {
    let mut engine = Engine::new();
    engine.register(jgroups_descriptor()?)?;
    engine.register(singleton_policy_descriptor()?)?;
    engine.register_transformer("subsystem", jgroups_transformer());
    Ok(engine)
}

/// `subsystem=jgroups`: default-channel superseded the deprecated
/// default-stack; channels are new in the current version, stacks predate it
fn jgroups_descriptor() -> Result<ResourceDescriptor> {
    Ok(ResourceDescriptor::fixed("subsystem", "jgroups")
        .add_attribute(
            AttributeDefinition::build("default-channel", AttrType::String)
                .allow_null(true)
                .allow_expression(true)
                .xml_name("default")
                .finish(),
        )?
        .add_attribute(
            AttributeDefinition::build("default-stack", AttrType::String)
                .allow_null(true)
                .allow_expression(true)
                .deprecated(CURRENT)
                .finish(),
        )?
        .add_child(
            ResourceDescriptor::wildcard("channel")
                .add_attribute(
                    AttributeDefinition::build("stack", AttrType::String)
                        .allow_null(true)
                        .finish(),
                )?
                .add_service(ServiceTemplate::primary("jgroups.channel")),
        )?
        .add_child(
            ResourceDescriptor::wildcard("stack")
                .add_attribute(
                    AttributeDefinition::build("statistics-enabled", AttrType::Boolean)
                        .default_value(Value::Boolean(false))
                        .finish(),
                )?
                .add_service(ServiceTemplate::primary("jgroups.stack")),
        )?)
}

/// `singleton-policy=*`: cache-container is required; the policy exports a
/// dynamic capability named after the policy instance
fn singleton_policy_descriptor() -> Result<ResourceDescriptor> {
    Ok(ResourceDescriptor::wildcard("singleton-policy")
        .add_attribute(AttributeDefinition::build("cache-container", AttrType::String).finish())?
        .add_attribute(
            AttributeDefinition::build("cache", AttrType::String)
                .default_value(Value::from("default"))
                .finish(),
        )?
        .add_attribute(
            AttributeDefinition::build("quorum", AttrType::Int)
                .default_value(Value::Int(1))
                .allow_expression(true)
                .finish(),
        )?
        .add_capability(Capability::dynamic(
            "org.wildfly.clustering.singleton.policy",
            "SingletonPolicy",
        ))
        .add_service(ServiceTemplate::primary("singleton.policy")))
}

/// Rules for peers older than the current subsystem version: channels do not
/// exist there, default-channel must be silently dropped when undefined and
/// rejected when set, and a stack payload loses its statistics flag
fn jgroups_transformer() -> TransformationDescription {
    TransformationDescription::new()
        .discard_attribute("default-channel", CURRENT, DiscardPolicy::IfUndefined)
        .reject_attribute("default-channel", CURRENT, RejectPolicy::IfDefined)
        .reject_attribute("default-stack", CURRENT, RejectPolicy::IfUndefined)
        .reject_child("channel", CURRENT)
        .recurse_child(
            "stack",
            TransformationDescription::new().discard_attribute(
                "statistics-enabled",
                CURRENT,
                DiscardPolicy::IfEqualsDefault(Value::Boolean(false)),
            ),
        )
}
