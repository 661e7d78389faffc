//! The node contract shared by every composite, decorator and leaf.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use grove_core::{AgentHandle, Blackboard, Status, TickContext};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process-unique node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Composite,
    Decorator,
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    Sequence,
    Selector,
    Parallel,
    Inverter,
    Repeat,
    Retry,
    Timeout,
    Action,
    Condition,
    /// Host-defined node registered through the unified registry namespace.
    Custom,
}

impl NodeKind {
    pub fn category(self) -> NodeCategory {
        match self {
            NodeKind::Sequence | NodeKind::Selector | NodeKind::Parallel => NodeCategory::Composite,
            NodeKind::Inverter | NodeKind::Repeat | NodeKind::Retry | NodeKind::Timeout => {
                NodeCategory::Decorator
            }
            NodeKind::Action | NodeKind::Condition | NodeKind::Custom => NodeCategory::Leaf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Sequence => "Sequence",
            NodeKind::Selector => "Selector",
            NodeKind::Parallel => "Parallel",
            NodeKind::Inverter => "Inverter",
            NodeKind::Repeat => "Repeat",
            NodeKind::Retry => "Retry",
            NodeKind::Timeout => "Timeout",
            NodeKind::Action => "Action",
            NodeKind::Condition => "Condition",
            NodeKind::Custom => "Custom",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration value applied through [`Node::set_property`].
///
/// Conversions are lenient: a node asks for the shape it wants and falls back
/// to its default when the value does not fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }

    /// Integral values only; `2.5` is not an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            PropertyValue::Number(_) => None,
            PropertyValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// `true` / `false` in any letter case.
    pub fn as_bool(&self) -> Option<bool> {
        let text = self.as_str()?.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

/// State every node carries: identity, tree links, properties and the bound
/// agent.
pub struct NodeCore {
    id: NodeId,
    name: String,
    parent: Option<NodeId>,
    children: Vec<Box<dyn Node>>,
    capacity: Option<usize>,
    properties: BTreeMap<String, PropertyValue>,
    agent: Option<AgentHandle>,
}

impl NodeCore {
    /// `capacity` bounds the number of children; `None` means unbounded.
    pub fn new(name: impl Into<String>, capacity: Option<usize>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            capacity,
            properties: BTreeMap::new(),
            agent: None,
        }
    }

    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn decorator(name: impl Into<String>) -> Self {
        Self::new(name, Some(1))
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name, Some(0))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut self.children
    }

    /// The single child of a decorator.
    pub fn first_child_mut(&mut self) -> Option<&mut Box<dyn Node>> {
        self.children.first_mut()
    }

    pub fn has_room(&self) -> bool {
        self.capacity.map_or(true, |cap| self.children.len() < cap)
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn agent(&self) -> Option<&AgentHandle> {
        self.agent.as_ref()
    }

    pub fn reset_children(&mut self) {
        for child in self.children.iter_mut() {
            child.reset();
        }
    }
}

impl fmt::Debug for NodeCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCore")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field(
                "children",
                &self.children.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("properties", &self.properties)
            .finish()
    }
}

/// A behavior tree node.
///
/// Implementors supply [`Node::core`], [`Node::kind`], [`Node::execute`] and
/// [`Node::reset`]; they interpret configuration in [`Node::configure`]. Tree
/// wiring (`add_child`, `remove_child`, agent binding) is provided.
pub trait Node: Send + 'static {
    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    fn kind(&self) -> NodeKind;

    /// Advances the node by exactly one tick.
    fn execute(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status;

    /// Returns this node and its subtree to their initial progress state.
    /// Must be idempotent.
    fn reset(&mut self);

    /// Interprets one property. Unknown keys must be ignored.
    fn configure(&mut self, _key: &str, _value: &PropertyValue) {}

    /// Cancellation notice for a running subtree whose continuation is being
    /// aborted by an ancestor.
    fn on_condition_failed(&mut self) {
        for child in self.core_mut().children_mut() {
            child.on_condition_failed();
        }
    }

    fn id(&self) -> NodeId {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn set_name(&mut self, name: String) {
        self.core_mut().set_name(name);
    }

    fn parent(&self) -> Option<NodeId> {
        self.core().parent()
    }

    fn children(&self) -> &[Box<dyn Node>] {
        self.core().children()
    }

    fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        self.core().properties()
    }

    fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.core().properties.get(key)
    }

    /// Records `value` under `key` and lets the node interpret it.
    fn set_property(&mut self, key: &str, value: PropertyValue) {
        self.configure(key, &value);
        self.core_mut().properties.insert(key.to_string(), value);
    }

    fn agent(&self) -> Option<&AgentHandle> {
        self.core().agent()
    }

    /// Binds `agent` to this node and its whole subtree.
    fn bind_agent(&mut self, agent: AgentHandle) {
        for child in self.core_mut().children_mut() {
            child.bind_agent(agent.clone());
        }
        self.core_mut().agent = Some(agent);
    }

    /// Appends `child`, taking ownership and setting its parent link. The
    /// child inherits this node's agent binding. Leaves and already-occupied
    /// decorators hand the child back.
    fn add_child(&mut self, mut child: Box<dyn Node>) -> Result<(), Box<dyn Node>> {
        if !self.core().has_room() {
            return Err(child);
        }
        child.core_mut().parent = Some(self.id());
        if let Some(agent) = self.core().agent.clone() {
            child.bind_agent(agent);
        }
        self.core_mut().children.push(child);
        Ok(())
    }

    /// Detaches the direct child with identity `id` and clears its parent link.
    fn remove_child(&mut self, id: NodeId) -> Option<Box<dyn Node>> {
        let children = &mut self.core_mut().children;
        let index = children.iter().position(|c| c.id() == id)?;
        let mut child = children.remove(index);
        child.core_mut().parent = None;
        Some(child)
    }
}

impl fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("core", self.core())
            .finish()
    }
}
