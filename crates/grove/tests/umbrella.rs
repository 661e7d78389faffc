#![cfg(feature = "full")]

use grove::bt::{BehaviorTree, NodeRegistry};
use grove::core::{Blackboard, ManualClock, Status};
use grove::tools::{LogHistory, LOG_HISTORY, NullSink};

const ALARM: &str = r#"
tree Alarm {
    Sequence raise {
        Condition HasValue { key: "intruder" }
        Action SetValue { key: "alarm" value: "on" }
        Action Log { message: "alarm raised" level: warn }
    }
}
"#;

#[test]
fn parse_and_tick_through_the_umbrella() {
    let registry = NodeRegistry::with_builtins();
    let root = grove::dsl::parse(ALARM, &registry, &mut NullSink).expect("well-formed");
    let mut tree = BehaviorTree::new(root, Box::new(ManualClock::new(0.0)));
    let mut bb = Blackboard::new();
    bb.set_typed(LOG_HISTORY, LogHistory::default());

    assert_eq!(tree.tick(&mut bb), Status::Failure);
    assert!(!bb.contains("alarm"));

    bb.set("intruder", true);
    assert_eq!(tree.tick(&mut bb), Status::Success);
    assert_eq!(bb.get::<String>("alarm").map(String::as_str), Some("on"));

    let history = bb.get_typed(LOG_HISTORY).expect("history installed");
    assert_eq!(history.records.len(), 1);
    assert_eq!(history.records[0].message, "alarm raised");
}

#[cfg(feature = "serde")]
#[test]
fn snapshots_serialize_to_json() {
    let registry = NodeRegistry::with_builtins();
    let root = grove::dsl::parse(ALARM, &registry, &mut NullSink).expect("well-formed");
    let snapshot = grove::bt::NodeSnapshot::capture(root.as_ref());
    let json = serde_json::to_value(snapshot).expect("serializable");

    assert_eq!(json["kind"], "Sequence");
    assert_eq!(json["name"], "raise");
    assert_eq!(json["properties"]["treeName"], "Alarm");
    assert_eq!(json["children"][1]["name"], "Action:SetValue");
    assert_eq!(json["children"][1]["properties"]["key"], "alarm");
}
