use grove_core::{AgentHandle, Blackboard, Status, TickContext};

use crate::node::{Node, NodeCore, NodeKind, PropertyValue};

/// The two leaf namespaces of the registry and the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeafKind {
    Action,
    Condition,
}

impl LeafKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LeafKind::Action => "Action",
            LeafKind::Condition => "Condition",
        }
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            LeafKind::Action => NodeKind::Action,
            LeafKind::Condition => NodeKind::Condition,
        }
    }
}

/// Terminal logic of an action or condition.
///
/// Leaves that span several ticks keep their own progress fields and clear
/// them in [`LeafBehavior::reset`].
pub trait LeafBehavior: Send + 'static {
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: Option<&AgentHandle>,
        blackboard: &mut Blackboard,
    ) -> Status;

    fn reset(&mut self) {}

    fn configure(&mut self, _key: &str, _value: &PropertyValue) {}

    fn on_condition_failed(&mut self) {
        self.reset();
    }
}

/// Adapts a [`LeafBehavior`] to the [`Node`] contract.
#[derive(Debug)]
pub struct Leaf<B> {
    core: NodeCore,
    kind: LeafKind,
    behavior: B,
}

impl<B: LeafBehavior> Leaf<B> {
    pub fn new(kind: LeafKind, behavior: B) -> Self {
        Self {
            core: NodeCore::leaf(kind.as_str()),
            kind,
            behavior,
        }
    }

    pub fn action(behavior: B) -> Self {
        Self::new(LeafKind::Action, behavior)
    }

    pub fn condition(behavior: B) -> Self {
        Self::new(LeafKind::Condition, behavior)
    }

    pub fn leaf_kind(&self) -> LeafKind {
        self.kind
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }
}

impl<F> Leaf<FnBehavior<F>>
where
    F: FnMut(&TickContext, Option<&AgentHandle>, &mut Blackboard) -> Status + Send + 'static,
{
    /// An action leaf backed by a closure.
    pub fn action_fn(f: F) -> Self {
        Self::action(FnBehavior(f))
    }
}

impl<F> Leaf<Predicate<F>>
where
    F: FnMut(&TickContext, &Blackboard) -> bool + Send + 'static,
{
    /// A condition leaf that succeeds while `predicate` holds.
    pub fn condition_fn(predicate: F) -> Self {
        Self::condition(Predicate(predicate))
    }
}

impl<B: LeafBehavior> Node for Leaf<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> NodeKind {
        self.kind.node_kind()
    }

    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        self.behavior.tick(ctx, self.core.agent(), blackboard)
    }

    fn reset(&mut self) {
        self.behavior.reset();
    }

    fn configure(&mut self, key: &str, value: &PropertyValue) {
        self.behavior.configure(key, value);
    }

    fn on_condition_failed(&mut self) {
        self.behavior.on_condition_failed();
    }
}

pub struct FnBehavior<F>(pub F);

impl<F> LeafBehavior for FnBehavior<F>
where
    F: FnMut(&TickContext, Option<&AgentHandle>, &mut Blackboard) -> Status + Send + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: Option<&AgentHandle>,
        blackboard: &mut Blackboard,
    ) -> Status {
        (self.0)(ctx, agent, blackboard)
    }
}

pub struct Predicate<F>(pub F);

impl<F> LeafBehavior for Predicate<F>
where
    F: FnMut(&TickContext, &Blackboard) -> bool + Send + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        _agent: Option<&AgentHandle>,
        blackboard: &mut Blackboard,
    ) -> Status {
        Status::from_bool((self.0)(ctx, &*blackboard))
    }
}
