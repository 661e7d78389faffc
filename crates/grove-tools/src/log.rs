#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use grove_core::{BbKey, Blackboard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lenient, case-insensitive parse. Unknown names yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// One diagnostic message.
///
/// Plain data so it can be buffered during a parse or a tick and rendered
/// later by tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogRecord {
    pub level: LogLevel,
    pub category: Cow<'static, str>,
    /// Name of the node the message is about, when there is one.
    pub node: Option<String>,
    /// Source line, for parser diagnostics.
    pub line: Option<usize>,
    pub message: String,
}

impl LogRecord {
    pub fn new(
        level: LogLevel,
        category: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            category: category.into(),
            node: None,
            line: None,
            message: message.into(),
        }
    }

    pub fn error(category: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, category, message)
    }

    pub fn warn(category: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, category, message)
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.category)?;
        if let Some(line) = self.line {
            write!(f, " line {line}:")?;
        }
        if let Some(node) = &self.node {
            write!(f, " ({node})")?;
        }
        write!(f, " {}", self.message)
    }
}

/// Destination for diagnostics. Implementations must not block or fail.
pub trait LogSink: Send {
    fn log(&mut self, record: LogRecord);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&mut self, _record: LogRecord) {}
}

#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<LogRecord>,
}

impl VecSink {
    pub fn errors(&self) -> impl Iterator<Item = &LogRecord> + '_ {
        self.records.iter().filter(|r| r.level == LogLevel::Error)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records.iter().any(|r| r.message.contains(needle))
    }
}

impl LogSink for VecSink {
    fn log(&mut self, record: LogRecord) {
        self.records.push(record);
    }
}

/// Forwards records to the `tracing` subscriber installed by the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&mut self, record: LogRecord) {
        let category = record.category.as_ref();
        let node = record.node.as_deref().unwrap_or("-");
        let line = record.line.unwrap_or(0);
        let message = record.message.as_str();
        match record.level {
            LogLevel::Trace => tracing::trace!(category, node, line, "{message}"),
            LogLevel::Debug => tracing::debug!(category, node, line, "{message}"),
            LogLevel::Info => tracing::info!(category, node, line, "{message}"),
            LogLevel::Warn => tracing::warn!(category, node, line, "{message}"),
            LogLevel::Error => tracing::error!(category, node, line, "{message}"),
        }
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn log(&mut self, record: LogRecord) {
        (**self).log(record);
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn log(&mut self, record: LogRecord) {
        (**self).log(record);
    }
}

/// In-memory record buffer. Unbounded by default; hosts running a tree for a
/// long time should either [`drain`](Self::drain) it or set a capacity, past
/// which the oldest records are dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogHistory {
    pub records: VecDeque<LogRecord>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub capacity: Option<usize>,
}

impl LogHistory {
    /// A history that keeps at most the `capacity` most recent records.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn push(&mut self, record: LogRecord) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.records.len() >= capacity {
                self.records.pop_front();
            }
        }
        self.records.push_back(record);
    }

    /// Takes every buffered record, oldest first.
    pub fn drain(&mut self) -> Vec<LogRecord> {
        self.records.drain(..).collect()
    }
}

/// Blackboard key for collecting records in-memory.
pub const LOG_HISTORY: BbKey<LogHistory> = BbKey::new("grove.log.history");
/// Blackboard key for streaming records into a host-provided sink.
pub const LOG_SINK: BbKey<Box<dyn LogSink>> = BbKey::new("grove.log.sink");

/// Reports `record` from inside a tick.
///
/// Writes to the history and the sink installed on `blackboard`; when no sink
/// is installed the record goes to `tracing`.
pub fn emit(blackboard: &mut Blackboard, record: LogRecord) {
    if let Some(history) = blackboard.get_mut::<LogHistory>(LOG_HISTORY.name()) {
        history.push(record.clone());
    }
    match blackboard.get_mut::<Box<dyn LogSink>>(LOG_SINK.name()) {
        Some(sink) => sink.log(record),
        None => TracingSink.log(record),
    }
}
