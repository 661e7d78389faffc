//! Generic leaves that every registry built with
//! [`NodeRegistry::with_builtins`](crate::NodeRegistry::with_builtins) knows.
//!
//! | DSL name              | kind              | properties                      |
//! |-----------------------|-------------------|---------------------------------|
//! | `Succeed`, `Fail`     | action, condition | –                               |
//! | `Wait`                | action            | `duration` (seconds, default 1) |
//! | `SetValue`            | action            | `key`, `value`                  |
//! | `Log`                 | action            | `message`, `level`              |
//! | `HasValue`            | condition         | `key`                           |
//! | `ValueEquals`         | condition         | `key`, `value`                  |

use grove_core::{AgentHandle, Blackboard, Status, TickContext};
use grove_tools::{emit, LogLevel, LogRecord};

use crate::leaf::LeafBehavior;
use crate::node::PropertyValue;

/// Always returns the same status.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub Status);

impl LeafBehavior for Constant {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, _: &mut Blackboard) -> Status {
        self.0
    }
}

/// `Running` until `duration` seconds have passed since its first tick.
#[derive(Debug, Clone)]
pub struct Wait {
    duration: f64,
    started_at: Option<f64>,
}

impl Wait {
    pub const DEFAULT_DURATION: f64 = 1.0;

    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            started_at: None,
        }
    }
}

impl Default for Wait {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION)
    }
}

impl LeafBehavior for Wait {
    fn tick(&mut self, ctx: &TickContext, _: Option<&AgentHandle>, _: &mut Blackboard) -> Status {
        let started = *self.started_at.get_or_insert(ctx.now);
        if ctx.elapsed_since(started) >= self.duration {
            self.started_at = None;
            Status::Success
        } else {
            Status::Running
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        if key == "duration" {
            self.duration = value
                .as_f64()
                .filter(|s| *s >= 0.0)
                .unwrap_or(Self::DEFAULT_DURATION);
        }
    }
}

/// Writes `value` under `key`: text as `String`, numbers as `f64`.
#[derive(Debug, Clone, Default)]
pub struct SetValue {
    key: Option<String>,
    value: Option<PropertyValue>,
}

impl LeafBehavior for SetValue {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, bb: &mut Blackboard) -> Status {
        let (Some(key), Some(value)) = (&self.key, &self.value) else {
            emit(
                bb,
                LogRecord::error("bt.leaf", "SetValue needs both 'key' and 'value'"),
            );
            return Status::Failure;
        };
        match value {
            PropertyValue::Text(text) => bb.set(key.clone(), text.clone()),
            PropertyValue::Number(n) => bb.set(key.clone(), *n),
        }
        Status::Success
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        match key {
            "key" => self.key = value.as_str().map(str::to_string),
            "value" => self.value = Some(value.clone()),
            _ => {}
        }
    }
}

/// Emits `message` through the blackboard's log sink and succeeds.
#[derive(Debug, Clone)]
pub struct Log {
    message: String,
    level: LogLevel,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            message: String::new(),
            level: LogLevel::Info,
        }
    }
}

impl LeafBehavior for Log {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, bb: &mut Blackboard) -> Status {
        emit(
            bb,
            LogRecord::new(self.level, "bt.leaf.log", self.message.clone()),
        );
        Status::Success
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        match key {
            "message" => self.message = value.to_string(),
            "level" => {
                self.level = value
                    .as_str()
                    .and_then(LogLevel::parse)
                    .unwrap_or(LogLevel::Info);
            }
            _ => {}
        }
    }
}

/// Succeeds when `key` is present on the blackboard.
#[derive(Debug, Clone, Default)]
pub struct HasValue {
    key: Option<String>,
}

impl LeafBehavior for HasValue {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, bb: &mut Blackboard) -> Status {
        Status::from_bool(self.key.as_deref().is_some_and(|key| bb.contains(key)))
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        if key == "key" {
            self.key = value.as_str().map(str::to_string);
        }
    }
}

/// Succeeds when the value under `key` equals `value`.
///
/// Stored `String`, `f64`, `i64` and `bool` values are compared with the
/// configured property using its lenient conversions.
#[derive(Debug, Clone, Default)]
pub struct ValueEquals {
    key: Option<String>,
    value: Option<PropertyValue>,
}

impl ValueEquals {
    fn matches(bb: &Blackboard, key: &str, expected: &PropertyValue) -> bool {
        if let Some(text) = bb.get::<String>(key) {
            return expected.to_string() == *text;
        }
        if let Some(n) = bb.get::<f64>(key) {
            return expected.as_f64() == Some(*n);
        }
        if let Some(n) = bb.get::<i64>(key) {
            return expected.as_i64() == Some(*n);
        }
        if let Some(flag) = bb.get::<bool>(key) {
            return expected.as_bool() == Some(*flag);
        }
        false
    }
}

impl LeafBehavior for ValueEquals {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, bb: &mut Blackboard) -> Status {
        match (&self.key, &self.value) {
            (Some(key), Some(expected)) => Status::from_bool(Self::matches(bb, key, expected)),
            _ => Status::Failure,
        }
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        match key {
            "key" => self.key = value.as_str().map(str::to_string),
            "value" => self.value = Some(value.clone()),
            _ => {}
        }
    }
}
