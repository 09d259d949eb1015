// Integration tests for the two-phase lifecycle against a realistic schema:
// a messaging-style server with queue/topic children and a singleton-policy
// style resource with defaulted attributes.

use std::collections::BTreeMap;

use rescfg_core::{
    AttrType, AttributeDefinition, Capability, Engine, Operation, RecordingHost, ResourceAddress,
    ResourceDescriptor, ResourceError, ResourceNode, ServiceTemplate, Value,
};

fn messaging_engine() -> Engine {
    let queue = ResourceDescriptor::wildcard("jms-queue")
        .add_service(ServiceTemplate::primary("messaging.queue"));
    let topic = ResourceDescriptor::wildcard("jms-topic")
        .add_service(ServiceTemplate::primary("messaging.topic"));
    let server = ResourceDescriptor::wildcard("server")
        .add_attribute(
            AttributeDefinition::build("persistence-enabled", AttrType::Boolean)
                .default_value(Value::Boolean(true))
                .finish(),
        )
        .unwrap()
        .add_capability(Capability::dynamic("org.wildfly.messaging.server", "Server"))
        .add_service(ServiceTemplate::primary("messaging.server"))
        .add_service(ServiceTemplate::secondary("messaging.server.jms.manager"))
        .add_child(queue)
        .unwrap()
        .add_child(topic)
        .unwrap();

    let mut engine = Engine::new();
    engine.register(server).unwrap();
    engine
}

fn policy_engine() -> Engine {
    let policy = ResourceDescriptor::wildcard("singleton-policy")
        .add_attribute(AttributeDefinition::build("cache-container", AttrType::String).finish())
        .unwrap()
        .add_attribute(
            AttributeDefinition::build("cache", AttrType::String)
                .default_value(Value::from("default"))
                .finish(),
        )
        .unwrap()
        .add_attribute(
            AttributeDefinition::build("quorum", AttrType::Int)
                .default_value(Value::Int(1))
                .finish(),
        )
        .unwrap()
        .add_capability(Capability::dynamic(
            "org.wildfly.clustering.singleton.policy",
            "SingletonPolicy",
        ));

    let mut engine = Engine::new();
    engine.register(policy).unwrap();
    engine
}

fn add(engine: &mut Engine, host: &mut RecordingHost, address: &ResourceAddress) {
    engine
        .execute(
            host,
            Operation::Add {
                address: address.clone(),
                values: BTreeMap::new(),
            },
        )
        .unwrap();
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

#[test]
fn test_add_applies_default_quorum() {
    let mut engine = policy_engine();
    let mut host = RecordingHost::new();

    let mut values = BTreeMap::new();
    values.insert("cache-container".to_string(), Value::from("server"));
    let outcome = engine
        .execute(
            &mut host,
            Operation::Add {
                address: ResourceAddress::of("singleton-policy", "a"),
                values,
            },
        )
        .unwrap();

    assert_eq!(*outcome.node().value("quorum"), Value::Int(1));
    assert_eq!(*outcome.node().value("cache"), Value::from("default"));
}

#[test]
fn test_add_accepts_zero_quorum() {
    // Bounds checks are the service host's concern, not this engine's.
    let mut engine = policy_engine();
    let mut host = RecordingHost::new();

    let mut values = BTreeMap::new();
    values.insert("cache-container".to_string(), Value::from("server"));
    values.insert("quorum".to_string(), Value::Int(0));
    let outcome = engine
        .execute(
            &mut host,
            Operation::Add {
                address: ResourceAddress::of("singleton-policy", "a"),
                values,
            },
        )
        .unwrap();
    assert_eq!(*outcome.node().value("quorum"), Value::Int(0));
}

#[test]
fn test_add_missing_required_attribute() {
    let mut engine = policy_engine();
    let mut host = RecordingHost::new();

    let result = engine.execute(
        &mut host,
        Operation::Add {
            address: ResourceAddress::of("singleton-policy", "a"),
            values: BTreeMap::new(),
        },
    );
    assert!(matches!(
        result,
        Err(ResourceError::MissingRequiredAttribute { ref attribute, .. })
            if attribute == "cache-container"
    ));
}

#[test]
fn test_add_registers_dynamic_capability() {
    let mut engine = policy_engine();
    let mut host = RecordingHost::new();

    let mut values = BTreeMap::new();
    values.insert("cache-container".to_string(), Value::from("server"));
    engine
        .execute(
            &mut host,
            Operation::Add {
                address: ResourceAddress::of("singleton-policy", "a"),
                values,
            },
        )
        .unwrap();

    assert!(engine
        .capabilities()
        .is_registered("org.wildfly.clustering.singleton.policy.a"));
}

// ---------------------------------------------------------------------------
// remove
// ---------------------------------------------------------------------------

#[test]
fn test_add_remove_round_trip() {
    let mut engine = messaging_engine();
    let mut host = RecordingHost::new();
    let address = ResourceAddress::of("server", "default");

    let before = engine.tree().root().clone();
    add(&mut engine, &mut host, &address);
    engine
        .execute(&mut host, Operation::Remove { address: address.clone() })
        .unwrap();

    assert_eq!(engine.tree().root().children, before.children);
    assert!(engine.capabilities().is_empty());
}

#[test]
fn test_remove_stops_child_services_before_parent_regardless_of_order() {
    let mut engine = messaging_engine();
    let server = ResourceAddress::of("server", "default");

    // Add children in the opposite order of their descriptor registration
    let mut host = RecordingHost::new();
    add(&mut engine, &mut host, &server);
    add(&mut engine, &mut host, &server.child("jms-topic", "events"));
    add(&mut engine, &mut host, &server.child("jms-queue", "orders"));
    host.events.clear();

    engine
        .execute(&mut host, Operation::Remove { address: server })
        .unwrap();

    let stopped = host.stopped();
    let parent_index = stopped
        .iter()
        .position(|s| *s == "messaging.server.default")
        .unwrap();
    let manager_index = stopped
        .iter()
        .position(|s| *s == "messaging.server.jms.manager.default")
        .unwrap();
    let queue_index = stopped
        .iter()
        .position(|s| *s == "messaging.queue.orders")
        .unwrap();
    let topic_index = stopped
        .iter()
        .position(|s| *s == "messaging.topic.events")
        .unwrap();

    assert!(queue_index < manager_index);
    assert!(topic_index < manager_index);
    assert!(manager_index < parent_index);
}

#[test]
fn test_remove_is_retryable_after_stop_failure() {
    let mut engine = messaging_engine();
    let server = ResourceAddress::of("server", "default");
    let mut host = RecordingHost::new();
    add(&mut engine, &mut host, &server);
    add(&mut engine, &mut host, &server.child("jms-queue", "orders"));

    let mut failing = RecordingHost::new();
    failing.fail_stop_of("messaging.server.default");
    let result = engine.execute(
        &mut failing,
        Operation::Remove { address: server.clone() },
    );
    assert!(matches!(result, Err(ResourceError::ServiceStopFailure { .. })));

    // Model phase was restored; the retry with a healthy host succeeds
    assert!(engine.tree().get(&server).is_ok());
    let mut healthy = RecordingHost::new();
    engine
        .execute(&mut healthy, Operation::Remove { address: server.clone() })
        .unwrap();
    assert!(engine.tree().get(&server).is_err());
}

#[test]
fn test_remove_skips_unregistered_child_kind() {
    // A child bucket of a kind the server descriptor never registered: the
    // remove cascade skips it and its service is never stopped. The
    // invariant sweep flags the bucket before the remove happens.
    let mut engine = messaging_engine();
    let server = ResourceAddress::of("server", "default");
    let mut host = RecordingHost::new();
    add(&mut engine, &mut host, &server);

    // Engine has no add path for unregistered kinds; splice the node in the
    // way a buggy schema source would.
    let mut tree = engine.tree().clone();
    tree.root_mut()
        .find_child_mut("server", "default")
        .unwrap()
        .attach_child(ResourceNode::new(
            server.child("divert", "d1"),
            BTreeMap::new(),
        ));

    let caps = rescfg_core::CapabilityRegistry::new();
    assert!(matches!(
        rescfg_core::rules::validate(&tree, &caps),
        Err(ResourceError::UnregisteredChildType { .. })
    ));

    let mut removed_host = RecordingHost::new();
    rescfg_core::RemoveStepHandler::new()
        .execute(
            &mut tree,
            &mut rescfg_core::CapabilityRegistry::new(),
            &mut removed_host,
            &server,
        )
        .unwrap();
    assert!(removed_host.stopped().iter().all(|s| !s.contains("divert")));
}

// ---------------------------------------------------------------------------
// concurrency-adjacent ordering (single-writer discipline)
// ---------------------------------------------------------------------------

#[test]
fn test_descendant_remove_completes_before_ancestor() {
    let mut engine = messaging_engine();
    let server = ResourceAddress::of("server", "default");
    let queue = server.child("jms-queue", "orders");
    let mut host = RecordingHost::new();
    add(&mut engine, &mut host, &server);
    add(&mut engine, &mut host, &queue);
    host.events.clear();

    // Serialized operations: the descendant's remove, including its service
    // stop, completes before the ancestor's remove begins.
    engine
        .execute(&mut host, Operation::Remove { address: queue })
        .unwrap();
    engine
        .execute(&mut host, Operation::Remove { address: server })
        .unwrap();

    assert_eq!(
        host.stopped(),
        vec![
            "messaging.queue.orders",
            "messaging.server.jms.manager.default",
            "messaging.server.default",
        ]
    );
}
