use std::sync::{Arc, Mutex};

use grove_core::Blackboard;
use grove_tools::{
    emit, LogHistory, LogLevel, LogRecord, LogSink, VecSink, LOG_HISTORY, LOG_SINK,
};

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<LogRecord>>>);

impl LogSink for SharedSink {
    fn log(&mut self, record: LogRecord) {
        if let Ok(mut records) = self.0.lock() {
            records.push(record);
        }
    }
}

#[test]
fn emit_writes_to_history_when_present() {
    let mut bb = Blackboard::new();
    bb.set_typed(LOG_HISTORY, LogHistory::default());

    emit(
        &mut bb,
        LogRecord::error("bt.node", "child missing").with_node("Retry:guard"),
    );

    let history = bb.get_typed(LOG_HISTORY).unwrap();
    assert_eq!(history.records.len(), 1);
    assert_eq!(history.records[0].level, LogLevel::Error);
    assert_eq!(history.records[0].category, "bt.node");
    assert_eq!(history.records[0].node.as_deref(), Some("Retry:guard"));
}

#[test]
fn bounded_history_keeps_most_recent_records() {
    let mut bb = Blackboard::new();
    bb.set_typed(LOG_HISTORY, LogHistory::bounded(2));

    for i in 0..5 {
        emit(&mut bb, LogRecord::warn("bt.leaf", format!("tick {i}")));
    }

    let history = bb.get_mut::<LogHistory>(LOG_HISTORY.name()).unwrap();
    assert_eq!(history.records.len(), 2);
    assert_eq!(history.records[0].message, "tick 3");

    let drained = history.drain();
    assert_eq!(drained.last().map(|r| r.message.as_str()), Some("tick 4"));
    assert!(history.records.is_empty());
}

#[test]
fn emit_writes_to_sink_when_present() {
    let mut bb = Blackboard::new();
    let handle = SharedSink::default();
    let shared = handle.0.clone();
    bb.set_typed(LOG_SINK, Box::new(handle) as Box<dyn LogSink>);

    emit(&mut bb, LogRecord::warn("bt.leaf", "slow"));

    let records = shared.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "slow");
}

#[test]
fn emit_without_sink_or_history_is_harmless() {
    let mut bb = Blackboard::new();
    emit(&mut bb, LogRecord::error("bt.node", "goes to tracing"));
    assert!(bb.is_empty());
}

#[test]
fn vec_sink_filters_errors() {
    let mut sink = VecSink::default();
    sink.log(LogRecord::warn("dsl", "just a warning"));
    sink.log(LogRecord::error("dsl", "expected '{'").with_line(3));

    let errors: Vec<_> = sink.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(3));
    assert!(sink.contains("expected '{'"));
    assert_eq!(errors[0].to_string(), "[dsl] line 3: expected '{'");
}

#[test]
fn level_names_parse_leniently() {
    assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Error));
    assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
    assert_eq!(LogLevel::parse("loud"), None);
}
