//! Multi-child control flow: [`Sequence`], [`Selector`] and [`Parallel`].
//!
//! Sequence and Selector keep a cursor so a `Running` child is resumed on the
//! next tick without re-evaluating the children before it. Both reset their
//! whole subtree as soon as they produce a terminal status.

use grove_core::{Blackboard, Status, TickContext};

use crate::node::{Node, NodeCore, NodeKind, PropertyValue};

/// Runs children in order until one fails (logical AND).
#[derive(Debug)]
pub struct Sequence {
    core: NodeCore,
    index: usize,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            core: NodeCore::composite("Sequence"),
            index: 0,
        }
    }

    /// Builder form: appends `children` in order.
    pub fn with_children(mut self, children: Vec<Box<dyn Node>>) -> Self {
        for child in children {
            let _ = self.add_child(child);
        }
        self
    }

    /// Index of the child resumed on the next tick.
    pub fn current_child_index(&self) -> usize {
        self.index
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Sequence {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        while self.index < self.core.children().len() {
            let status = self.core.children_mut()[self.index].execute(ctx, blackboard);
            match status {
                Status::Running => return Status::Running,
                Status::Failure => {
                    self.reset();
                    return Status::Failure;
                }
                Status::Success => self.index += 1,
            }
        }

        self.reset();
        Status::Success
    }

    fn reset(&mut self) {
        self.core.reset_children();
        self.index = 0;
    }
}

/// Runs children in order until one succeeds (logical OR).
#[derive(Debug)]
pub struct Selector {
    core: NodeCore,
    index: usize,
}

impl Selector {
    pub fn new() -> Self {
        Self {
            core: NodeCore::composite("Selector"),
            index: 0,
        }
    }

    pub fn with_children(mut self, children: Vec<Box<dyn Node>>) -> Self {
        for child in children {
            let _ = self.add_child(child);
        }
        self
    }

    pub fn current_child_index(&self) -> usize {
        self.index
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Selector {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Selector
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        while self.index < self.core.children().len() {
            let status = self.core.children_mut()[self.index].execute(ctx, blackboard);
            match status {
                Status::Running => return Status::Running,
                Status::Success => {
                    self.reset();
                    return Status::Success;
                }
                Status::Failure => self.index += 1,
            }
        }

        self.reset();
        Status::Failure
    }

    fn reset(&mut self) {
        self.core.reset_children();
        self.index = 0;
    }
}

/// Ticks every child on every tick and combines that tick's results.
///
/// Succeeds when `success_threshold` children succeeded (default: all of
/// them) and fails when `failure_threshold` children failed (default: one).
/// If no child is running and the success threshold was missed the Parallel
/// fails. On a terminal result the children still running are cancelled.
#[derive(Debug)]
pub struct Parallel {
    core: NodeCore,
    success_threshold: Option<usize>,
    failure_threshold: usize,
}

impl Parallel {
    pub fn new() -> Self {
        Self {
            core: NodeCore::composite("Parallel"),
            success_threshold: None,
            failure_threshold: 1,
        }
    }

    pub fn with_children(mut self, children: Vec<Box<dyn Node>>) -> Self {
        for child in children {
            let _ = self.add_child(child);
        }
        self
    }

    pub fn with_thresholds(mut self, success: usize, failure: usize) -> Self {
        self.success_threshold = Some(success.max(1));
        self.failure_threshold = failure.max(1);
        self
    }

    /// Effective `(success, failure)` thresholds for the current child count.
    pub fn thresholds(&self) -> (usize, usize) {
        let n = self.core.children().len().max(1);
        let success = self.success_threshold.unwrap_or(n).clamp(1, n);
        let failure = self.failure_threshold.clamp(1, n);
        (success, failure)
    }

    fn finish(&mut self, status: Status, results: &[Status]) -> Status {
        for (child, result) in self.core.children_mut().iter_mut().zip(results) {
            if *result == Status::Running {
                child.on_condition_failed();
            }
        }
        self.reset();
        status
    }
}

impl Default for Parallel {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Parallel {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Parallel
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        let parsed = value.as_i64().filter(|n| *n >= 1).map(|n| n as usize);
        match key {
            "success_threshold" => self.success_threshold = parsed,
            "failure_threshold" => self.failure_threshold = parsed.unwrap_or(1),
            _ => {}
        }
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        let n = self.core.children().len();
        if n == 0 {
            return Status::Success;
        }

        let results: Vec<Status> = self
            .core
            .children_mut()
            .iter_mut()
            .map(|child| child.execute(ctx, blackboard))
            .collect();

        let successes = results.iter().filter(|r| **r == Status::Success).count();
        let failures = results.iter().filter(|r| **r == Status::Failure).count();
        let (need_success, need_failure) = self.thresholds();

        if successes >= need_success {
            self.finish(Status::Success, &results)
        } else if failures >= need_failure || successes + failures == n {
            self.finish(Status::Failure, &results)
        } else {
            Status::Running
        }
    }

    fn reset(&mut self) {
        self.core.reset_children();
    }
}
