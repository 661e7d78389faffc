use grove_core::{AgentHandle, Blackboard, Clock, Status, SystemClock, TickContext};

use crate::node::Node;

/// Drives a root node: stamps each tick with a counter and a clock reading,
/// and resets the root once it reaches a terminal status so the next tick
/// starts a fresh run.
pub struct BehaviorTree {
    root: Box<dyn Node>,
    clock: Box<dyn Clock>,
    tick: u64,
    last: Status,
}

impl BehaviorTree {
    pub fn new(root: Box<dyn Node>, clock: Box<dyn Clock>) -> Self {
        Self {
            root,
            clock,
            tick: 0,
            last: Status::Running,
        }
    }

    /// A tree timed by the wall clock.
    pub fn with_system_clock(root: Box<dyn Node>) -> Self {
        Self::new(root, Box::new(SystemClock::new()))
    }

    /// Binds `agent` to every node of the tree.
    pub fn with_agent(mut self, agent: AgentHandle) -> Self {
        self.root.bind_agent(agent);
        self
    }

    pub fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        let ctx = TickContext::new(self.tick, self.clock.now());
        self.tick += 1;

        self.last = self.root.execute(&ctx, blackboard);
        if self.last.is_terminal() {
            tracing::debug!(
                tick = ctx.tick,
                status = %self.last,
                root = self.root.name(),
                "tree finished"
            );
            self.root.reset();
        }
        self.last
    }

    /// Abandons the current run: running subtrees are cancelled, then reset.
    pub fn reset(&mut self) {
        self.root.on_condition_failed();
        self.root.reset();
        self.last = Status::Running;
    }

    pub fn last_status(&self) -> Status {
        self.last
    }

    /// Number of ticks executed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn root(&self) -> &dyn Node {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut dyn Node {
        self.root.as_mut()
    }

    pub fn into_root(self) -> Box<dyn Node> {
        self.root
    }
}

impl std::fmt::Debug for BehaviorTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("root", &self.root.name())
            .field("tick", &self.tick)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
