mod common;

use common::ctx;
use grove_bt::{Leaf, LeafBehavior, LeafKind, Node, NodeKind, NodeRegistry, RegistryError, Sequence};
use grove_core::{AgentHandle, Blackboard, Status, TickContext};

#[derive(Default)]
struct Counter {
    calls: u32,
}

impl LeafBehavior for Counter {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, bb: &mut Blackboard) -> Status {
        self.calls += 1;
        bb.set("calls", self.calls);
        Status::Success
    }
}

#[test]
fn created_instances_do_not_share_state() {
    let mut registry = NodeRegistry::new();
    registry.register_action("Foo", Counter::default).unwrap();

    let mut first = registry.create(LeafKind::Action, "Foo").expect("registered");
    let mut second = registry.create(LeafKind::Action, "Foo").expect("registered");
    assert_ne!(first.id(), second.id());

    let mut bb = Blackboard::new();
    first.execute(&ctx(0, 0.0), &mut bb);
    first.execute(&ctx(1, 0.0), &mut bb);
    assert_eq!(bb.get::<u32>("calls"), Some(&2));

    second.execute(&ctx(2, 0.0), &mut bb);
    assert_eq!(bb.get::<u32>("calls"), Some(&1));
}

#[test]
fn unknown_names_yield_none() {
    let registry = NodeRegistry::with_builtins();
    assert!(registry.create(LeafKind::Action, "Teleport").is_none());
    assert!(registry.create_node("Teleport").is_none());
    assert!(!registry.contains(LeafKind::Condition, "Teleport"));
}

#[test]
fn empty_names_are_rejected() {
    let mut registry = NodeRegistry::new();
    assert_eq!(
        registry.register_condition("", Counter::default),
        Err(RegistryError::EmptyName)
    );
    assert!(registry.is_empty());
}

#[test]
fn namespaces_are_separate_but_fall_back_to_unified() {
    let mut registry = NodeRegistry::new();
    registry.register_action("Only", Counter::default).unwrap();
    registry
        .register_node("Shared", || Box::new(Sequence::new()) as Box<dyn Node>)
        .unwrap();

    assert!(registry.create(LeafKind::Action, "Only").is_some());
    assert!(registry.create(LeafKind::Condition, "Only").is_none());

    let shared = registry.create(LeafKind::Condition, "Shared").expect("fallback");
    assert_eq!(shared.kind(), NodeKind::Sequence);
    assert_eq!(registry.node_names(), vec!["Shared"]);
    assert_eq!(registry.len(), 2);
}

#[test]
fn re_registering_replaces_the_factory() {
    let mut registry = NodeRegistry::new();
    registry.register_action("Step", Counter::default).unwrap();
    registry
        .register(LeafKind::Action, "Step", || {
            Box::new(Leaf::action_fn(|_, _, _| Status::Failure)) as Box<dyn Node>
        })
        .unwrap();

    let mut node = registry.create(LeafKind::Action, "Step").expect("registered");
    assert_eq!(node.execute(&ctx(0, 0.0), &mut Blackboard::new()), Status::Failure);
    assert_eq!(registry.names(LeafKind::Action), vec!["Step"]);
}

#[test]
fn builtins_cover_both_namespaces() {
    let registry = NodeRegistry::with_builtins();
    assert_eq!(
        registry.names(LeafKind::Action),
        vec!["Fail", "Log", "SetValue", "Succeed", "Wait"]
    );
    assert_eq!(
        registry.names(LeafKind::Condition),
        vec!["Fail", "HasValue", "Succeed", "ValueEquals"]
    );

    let node = registry.create(LeafKind::Condition, "HasValue").expect("builtin");
    assert_eq!(node.kind(), NodeKind::Condition);
}
