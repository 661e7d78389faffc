use std::io::Write;

use grove_bt::{LeafKind, Node, NodeKind, NodeRegistry, NodeSnapshot, PropertyValue};
use grove_core::{Blackboard, Status, TickContext};
use grove_dsl::{parse, parse_file, ParseError};
use grove_tools::{NullSink, VecSink};

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::with_builtins();
    for name in ["A", "Patrol", "Attack"] {
        registry
            .register(LeafKind::Action, name, || {
                Box::new(grove_bt::Leaf::action_fn(|_, _, _| Status::Success)) as Box<dyn Node>
            })
            .unwrap();
    }
    registry
        .register_condition("EnemyVisible", || grove_bt::leaves::Constant(Status::Failure))
        .unwrap();
    registry
}

const GUARD: &str = r#"
# Guard behavior
tree Guard {
    Selector root {
        Sequence engage {
            Condition EnemyVisible { }
            Action Attack { damage: 12.5 }
        }
        Repeat patrol_loop {
            count: 3
            stop_on_failure: false
            Action Patrol { route: "north gate" }
        }
    }
}
"#;

#[test]
fn minimal_tree_yields_root_with_single_leaf() {
    for (kind, keyword) in [
        (NodeKind::Sequence, "Sequence"),
        (NodeKind::Selector, "Selector"),
        (NodeKind::Parallel, "Parallel"),
    ] {
        let source = format!("tree Minimal {{ {keyword} S {{ Action A {{ }} }} }}");
        let root = parse(&source, &registry(), &mut NullSink).expect("well-formed");

        assert_eq!(root.kind(), kind);
        assert_eq!(root.name(), "S");
        assert_eq!(root.parent(), None);
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), "Action:A");
        assert_eq!(root.children()[0].parent(), Some(root.id()));
        assert_eq!(
            root.property("treeName"),
            Some(&PropertyValue::Text("Minimal".into()))
        );
    }
}

#[test]
fn properties_and_children_keep_declaration_order() {
    let root = parse(GUARD, &registry(), &mut NullSink).expect("well-formed");
    let snapshot = NodeSnapshot::capture(root.as_ref());

    let names: Vec<&str> = snapshot.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["engage", "patrol_loop"]);

    let engage = &snapshot.children[0];
    assert_eq!(engage.children[0].name, "Condition:EnemyVisible");
    assert_eq!(engage.children[0].kind, NodeKind::Condition);
    assert_eq!(
        engage.children[1].properties.get("damage"),
        Some(&PropertyValue::Number(12.5))
    );

    let repeat = &snapshot.children[1];
    assert_eq!(repeat.kind, NodeKind::Repeat);
    assert_eq!(repeat.properties.get("count"), Some(&PropertyValue::Number(3.0)));
    // Unquoted identifiers are kept as text; the node decides what they mean.
    assert_eq!(
        repeat.properties.get("stop_on_failure"),
        Some(&PropertyValue::Text("false".into()))
    );
    assert_eq!(
        repeat.children[0].properties.get("route"),
        Some(&PropertyValue::Text("north gate".into()))
    );
}

#[test]
fn reparsing_produces_equal_snapshots() {
    let registry = registry();
    let first = parse(GUARD, &registry, &mut NullSink).expect("well-formed");
    let second = parse(GUARD, &registry, &mut NullSink).expect("well-formed");

    assert_eq!(
        NodeSnapshot::capture(first.as_ref()),
        NodeSnapshot::capture(second.as_ref())
    );
    assert_ne!(first.id(), second.id());
}

#[test]
fn parsed_properties_configure_nodes() {
    let mut root = parse(GUARD, &registry(), &mut NullSink).expect("well-formed");
    let mut bb = Blackboard::new();

    // engage fails on the condition, patrol_loop repeats Patrol three times.
    let statuses: Vec<Status> = (0..3)
        .map(|t| root.execute(&TickContext::new(t, 0.0), &mut bb))
        .collect();
    assert_eq!(statuses, vec![Status::Running, Status::Running, Status::Success]);
}

#[test]
fn missing_tree_is_reported() {
    let mut sink = VecSink::default();
    let err = parse("# nothing here\nSequence S { }", &registry(), &mut sink).unwrap_err();
    assert!(matches!(err, ParseError::NoTree));
    assert_eq!(sink.errors().count(), 1);

    assert!(matches!(
        parse("", &registry(), &mut NullSink),
        Err(ParseError::NoTree)
    ));
}

#[test]
fn leading_tokens_before_tree_are_ignored() {
    let source = "stray words : { } 42\ntree T { Sequence S { } }";
    let root = parse(source, &registry(), &mut NullSink).expect("well-formed");
    assert_eq!(root.name(), "S");
    assert!(root.children().is_empty());
}

#[test]
fn unknown_child_type_is_dropped_and_siblings_survive() {
    let source = r#"
tree T {
    Sequence S {
        Action A { }
        Blink now { speed: 3 Action A { } }
        Action Patrol { }
    }
}
"#;
    let mut sink = VecSink::default();
    let root = parse(source, &registry(), &mut sink).expect("root still valid");

    let names: Vec<&str> = root.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Action:A", "Action:Patrol"]);
    assert!(sink.contains("unknown node type 'Blink'"));
    assert_eq!(sink.records[0].line, Some(5));
}

#[test]
fn unregistered_leaf_contributes_no_node() {
    let source = "tree T { Selector S { Action Teleport { } Condition EnemyVisible { } } }";
    let mut sink = VecSink::default();
    let root = parse(source, &registry(), &mut sink).expect("root still valid");

    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].name(), "Condition:EnemyVisible");
    assert!(sink.contains("no action registered under 'Teleport'"));
    assert_eq!(sink.records[0].node.as_deref(), Some("Teleport"));
}

#[test]
fn malformed_property_fails_only_that_node() {
    let source = r#"
tree T {
    Sequence S {
        Repeat broken {
            count: :
            Action A { }
        }
        Action Patrol { }
    }
}
"#;
    let mut sink = VecSink::default();
    let root = parse(source, &registry(), &mut sink).expect("root still valid");

    let names: Vec<&str> = root.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Action:Patrol"]);
    assert!(sink.contains("property 'count' expects a value, found `:`"));
}

#[test]
fn missing_name_fails_node() {
    let source = "tree T { Sequence S { Inverter { Action A { } } Action A { } } }";
    let mut sink = VecSink::default();
    let root = parse(source, &registry(), &mut sink).expect("root still valid");

    assert_eq!(root.children().len(), 1);
    assert!(sink.contains("expected a name after `Inverter`"));
}

#[test]
fn root_level_failures_return_no_tree() {
    let cases = [
        "tree { Sequence S { } }",
        "tree T Sequence S { } }",
        "tree T { }",
        "tree T { Sequence S { }",
        "tree T { Sequence S { } Sequence Extra { } }",
        "tree T { Action Teleport { } }",
        "tree T { Sequence S { Action A { }",
    ];
    for source in cases {
        let mut sink = VecSink::default();
        let result = parse(source, &registry(), &mut sink);
        assert!(
            matches!(result, Err(ParseError::Syntax { .. })),
            "expected a syntax error for {source:?}"
        );
        assert!(sink.errors().count() >= 1, "no diagnostics for {source:?}");
    }
}

#[test]
fn decorator_keeps_first_child_and_reports_extras() {
    let source = "tree T { Inverter not { Action A { } Action Patrol { } } }";
    let mut sink = VecSink::default();
    let root = parse(source, &registry(), &mut sink).expect("well-formed");

    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].name(), "Action:A");
    assert!(sink.contains("cannot take child 'Action:Patrol'"));
}

#[test]
fn builtin_leaves_are_configured_from_properties() {
    let source = r#"
tree Setup {
    Sequence S {
        Action SetValue { key: "mode" value: 'alert' }
        Condition ValueEquals { key: mode value: alert }
    }
}
"#;
    let mut root = parse(source, &registry(), &mut NullSink).expect("well-formed");
    let mut bb = Blackboard::new();
    assert_eq!(root.execute(&TickContext::new(0, 0.0), &mut bb), Status::Success);
    assert_eq!(bb.get::<String>("mode").map(String::as_str), Some("alert"));
}

#[test]
fn parse_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "tree Disk {{ Sequence S {{ Action A {{ }} }} }}").expect("write");

    let root = parse_file(file.path(), &registry(), &mut NullSink).expect("well-formed");
    assert_eq!(
        root.property("treeName"),
        Some(&PropertyValue::Text("Disk".into()))
    );
}

#[test]
fn missing_file_is_reported_through_the_sink() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.bt");
    let mut sink = VecSink::default();

    let err = parse_file(&path, &registry(), &mut sink).unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
    assert!(sink.contains("cannot read"));
}

#[test]
fn bundled_demo_parses_cleanly() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/guard.bt");
    let mut sink = VecSink::default();
    let root = parse_file(&path, &NodeRegistry::with_builtins(), &mut sink).expect("demo parses");

    assert!(sink.records.is_empty(), "unexpected diagnostics: {:?}", sink.records);
    assert_eq!(NodeSnapshot::capture(root.as_ref()).node_count(), 8);
}
