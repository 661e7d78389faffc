//! Single-child nodes that transform or gate their child's result.
//!
//! Configuration arrives through [`Node::set_property`]; a value that cannot
//! be interpreted leaves the setting at its default.

use grove_core::{Blackboard, Status, TickContext};
use grove_tools::{emit, LogRecord};

use crate::node::{Node, NodeCore, NodeKind, PropertyValue};

fn missing_child(core: &NodeCore, blackboard: &mut Blackboard) -> Status {
    emit(
        blackboard,
        LogRecord::error("bt.decorator", "decorator has no child").with_node(core.name()),
    );
    Status::Failure
}

/// Swaps `Success` and `Failure`; `Running` passes through.
#[derive(Debug)]
pub struct Inverter {
    core: NodeCore,
}

impl Inverter {
    pub fn new() -> Self {
        Self {
            core: NodeCore::decorator("Inverter"),
        }
    }

    pub fn wrapping(child: Box<dyn Node>) -> Self {
        let mut node = Self::new();
        let _ = node.add_child(child);
        node
    }
}

impl Default for Inverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Inverter {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Inverter
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        match self.core.first_child_mut() {
            Some(child) => child.execute(ctx, blackboard).invert(),
            None => missing_child(&self.core, blackboard),
        }
    }

    fn reset(&mut self) {
        self.core.reset_children();
    }
}

/// Re-runs its child, counting completions.
///
/// Properties: `count` (negative means unbounded, the default),
/// `stop_on_failure` (default false), `reset_child` (default true).
/// Failures count toward `count` unless `stop_on_failure` is set.
#[derive(Debug)]
pub struct Repeat {
    core: NodeCore,
    count: Option<u32>,
    stop_on_failure: bool,
    reset_child: bool,
    current_count: u32,
}

impl Repeat {
    pub fn new() -> Self {
        Self {
            core: NodeCore::decorator("Repeat"),
            count: None,
            stop_on_failure: false,
            reset_child: true,
            current_count: 0,
        }
    }

    pub fn wrapping(child: Box<dyn Node>) -> Self {
        let mut node = Self::new();
        let _ = node.add_child(child);
        node
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    pub fn current_count(&self) -> u32 {
        self.current_count
    }

    fn bound_reached(&self) -> bool {
        self.count.is_some_and(|limit| self.current_count >= limit)
    }

    fn continue_loop(&mut self) -> Status {
        if self.reset_child {
            self.core.reset_children();
        }
        Status::Running
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Repeat {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Repeat
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        match key {
            "count" => {
                self.count = value
                    .as_i64()
                    .filter(|n| *n >= 0)
                    .map(|n| u32::try_from(n).unwrap_or(u32::MAX));
            }
            "stop_on_failure" => self.stop_on_failure = value.as_bool().unwrap_or(false),
            "reset_child" => self.reset_child = value.as_bool().unwrap_or(true),
            _ => {}
        }
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        if self.bound_reached() {
            return Status::Success;
        }
        let status = match self.core.first_child_mut() {
            Some(child) => child.execute(ctx, blackboard),
            None => return missing_child(&self.core, blackboard),
        };

        match status {
            Status::Running => Status::Running,
            Status::Success => {
                self.current_count = self.current_count.saturating_add(1);
                if self.bound_reached() {
                    Status::Success
                } else {
                    self.continue_loop()
                }
            }
            Status::Failure => {
                self.current_count = self.current_count.saturating_add(1);
                if self.stop_on_failure {
                    Status::Failure
                } else if self.bound_reached() {
                    Status::Success
                } else {
                    self.continue_loop()
                }
            }
        }
    }

    fn reset(&mut self) {
        self.core.reset_children();
        self.current_count = 0;
    }

    fn on_condition_failed(&mut self) {
        self.current_count = 0;
        for child in self.core.children_mut() {
            child.on_condition_failed();
        }
    }
}

/// Re-runs a failing child up to `max_retries` times.
///
/// Properties: `max_retries` (default 3), `retry_delay` in seconds (default 0).
///
/// A failure puts the node into a waiting state and reports `Running`. The
/// retry budget is checked when the next tick arrives, so after the last
/// allowed failure one more `Running` tick is spent before `Failure`.
#[derive(Debug)]
pub struct Retry {
    core: NodeCore,
    max_retries: u32,
    retry_delay: f64,
    current_retries: u32,
    waiting_for_retry: bool,
    last_retry_time: f64,
}

impl Retry {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn new() -> Self {
        Self {
            core: NodeCore::decorator("Retry"),
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_delay: 0.0,
            current_retries: 0,
            waiting_for_retry: false,
            last_retry_time: 0.0,
        }
    }

    pub fn wrapping(child: Box<dyn Node>) -> Self {
        let mut node = Self::new();
        let _ = node.add_child(child);
        node
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, seconds: f64) -> Self {
        self.retry_delay = seconds.max(0.0);
        self
    }

    pub fn current_retries(&self) -> u32 {
        self.current_retries
    }

    pub fn is_waiting_for_retry(&self) -> bool {
        self.waiting_for_retry
    }

    fn clear(&mut self) {
        self.current_retries = 0;
        self.waiting_for_retry = false;
        self.last_retry_time = 0.0;
    }
}

impl Default for Retry {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Retry {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Retry
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        match key {
            "max_retries" => {
                self.max_retries = value
                    .as_i64()
                    .filter(|n| *n >= 0)
                    .map_or(Self::DEFAULT_MAX_RETRIES, |n| {
                        u32::try_from(n).unwrap_or(u32::MAX)
                    });
            }
            "retry_delay" => {
                self.retry_delay = value.as_f64().filter(|s| *s >= 0.0).unwrap_or(0.0);
            }
            _ => {}
        }
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        if self.waiting_for_retry {
            if self.current_retries > self.max_retries {
                self.clear();
                return Status::Failure;
            }
            if self.retry_delay > 0.0 && ctx.elapsed_since(self.last_retry_time) < self.retry_delay
            {
                return Status::Running;
            }
            self.waiting_for_retry = false;
            self.core.reset_children();
        }

        let status = match self.core.first_child_mut() {
            Some(child) => child.execute(ctx, blackboard),
            None => return missing_child(&self.core, blackboard),
        };

        match status {
            Status::Running => Status::Running,
            Status::Success => {
                self.current_retries = 0;
                Status::Success
            }
            Status::Failure => {
                self.current_retries = self.current_retries.saturating_add(1);
                self.waiting_for_retry = true;
                self.last_retry_time = ctx.now;
                Status::Running
            }
        }
    }

    fn reset(&mut self) {
        self.core.reset_children();
        self.clear();
    }

    fn on_condition_failed(&mut self) {
        self.clear();
        for child in self.core.children_mut() {
            child.on_condition_failed();
        }
    }
}

/// Fails (or succeeds) its child once a deadline passes.
///
/// Properties: `timeout` in seconds (default 5, never below 0.1),
/// `success_on_timeout` (default false). Once the deadline has passed the
/// child is cancelled instead of ticked.
#[derive(Debug)]
pub struct Timeout {
    core: NodeCore,
    timeout: f64,
    success_on_timeout: bool,
    running: bool,
    start_time: f64,
}

impl Timeout {
    pub const DEFAULT_TIMEOUT: f64 = 5.0;
    pub const MIN_TIMEOUT: f64 = 0.1;

    pub fn new() -> Self {
        Self {
            core: NodeCore::decorator("Timeout"),
            timeout: Self::DEFAULT_TIMEOUT,
            success_on_timeout: false,
            running: false,
            start_time: 0.0,
        }
    }

    pub fn wrapping(child: Box<dyn Node>) -> Self {
        let mut node = Self::new();
        let _ = node.add_child(child);
        node
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds.max(Self::MIN_TIMEOUT);
        self
    }

    pub fn with_success_on_timeout(mut self, success: bool) -> Self {
        self.success_on_timeout = success;
        self
    }

    pub fn timeout(&self) -> f64 {
        self.timeout
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Timeout {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Timeout
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        match key {
            "timeout" => {
                self.timeout = value
                    .as_f64()
                    .map_or(Self::DEFAULT_TIMEOUT, |s| s.max(Self::MIN_TIMEOUT));
            }
            "success_on_timeout" => self.success_on_timeout = value.as_bool().unwrap_or(false),
            _ => {}
        }
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        if !self.running {
            self.running = true;
            self.start_time = ctx.now;
        }

        if ctx.elapsed_since(self.start_time) >= self.timeout {
            for child in self.core.children_mut() {
                child.on_condition_failed();
            }
            self.running = false;
            return Status::from_bool(self.success_on_timeout);
        }

        let status = match self.core.first_child_mut() {
            Some(child) => child.execute(ctx, blackboard),
            None => {
                self.running = false;
                return missing_child(&self.core, blackboard);
            }
        };
        if status.is_terminal() {
            self.running = false;
        }
        status
    }

    fn reset(&mut self) {
        self.core.reset_children();
        self.running = false;
        self.start_time = 0.0;
    }

    fn on_condition_failed(&mut self) {
        self.running = false;
        for child in self.core.children_mut() {
            child.on_condition_failed();
        }
    }
}
