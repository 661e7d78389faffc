#![cfg(feature = "serde")]

use grove_tools::{LogHistory, LogRecord};

#[test]
fn log_history_json_roundtrip() {
    let mut history = LogHistory::bounded(8);
    history.push(LogRecord::error("dsl.parse", "unknown node type 'Loop'").with_line(4));
    history.push(LogRecord::warn("bt.registry", "overwriting 'Wait'").with_node("Action:Wait"));

    let json = serde_json::to_string(&history).expect("serialize");
    let roundtrip: LogHistory = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, history);
}
