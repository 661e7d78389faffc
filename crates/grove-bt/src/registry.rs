//! Name → factory lookup used to instantiate leaves by script name.
//!
//! Three namespaces: actions, conditions, and a unified namespace for any node
//! kind (used by bulk registration code). Leaf lookups fall back to the
//! unified namespace, so a node registered there can be referenced from the
//! DSL as either `Action Name` or `Condition Name`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use grove_core::Status;
use thiserror::Error;

use crate::leaf::{Leaf, LeafBehavior, LeafKind};
use crate::leaves::{Constant, HasValue, Log, SetValue, ValueEquals, Wait};
use crate::node::Node;

/// Produces a fresh, independent node on every call.
pub type NodeFactory = Arc<dyn Fn() -> Box<dyn Node> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("node names must not be empty")]
    EmptyName,
}

#[derive(Clone, Default)]
pub struct NodeRegistry {
    actions: BTreeMap<String, NodeFactory>,
    conditions: BTreeMap<String, NodeFactory>,
    nodes: BTreeMap<String, NodeFactory>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the generic leaves from [`crate::leaves`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    pub fn register_builtins(&mut self) {
        for kind in [LeafKind::Action, LeafKind::Condition] {
            self.insert_builtin(kind, "Succeed", || Constant(Status::Success));
            self.insert_builtin(kind, "Fail", || Constant(Status::Failure));
        }
        self.insert_builtin(LeafKind::Action, "Wait", Wait::default);
        self.insert_builtin(LeafKind::Action, "SetValue", SetValue::default);
        self.insert_builtin(LeafKind::Action, "Log", Log::default);
        self.insert_builtin(LeafKind::Condition, "HasValue", HasValue::default);
        self.insert_builtin(LeafKind::Condition, "ValueEquals", ValueEquals::default);
    }

    /// Registers `factory` under `name` in the `kind` namespace. Re-registering
    /// a name replaces the previous factory.
    pub fn register<F>(
        &mut self,
        kind: LeafKind,
        name: impl Into<String>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Node> + Send + Sync + 'static,
    {
        let name = checked_name(name)?;
        if self
            .namespace_mut(kind)
            .insert(name.clone(), Arc::new(factory))
            .is_some()
        {
            tracing::debug!(kind = kind.as_str(), %name, "replaced registered factory");
        }
        Ok(())
    }

    /// Registers a leaf behavior; each created node wraps a fresh `make()`.
    pub fn register_action<B, F>(
        &mut self,
        name: impl Into<String>,
        make: F,
    ) -> Result<(), RegistryError>
    where
        B: LeafBehavior,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.register(LeafKind::Action, name, move || {
            Box::new(Leaf::action(make())) as Box<dyn Node>
        })
    }

    pub fn register_condition<B, F>(
        &mut self,
        name: impl Into<String>,
        make: F,
    ) -> Result<(), RegistryError>
    where
        B: LeafBehavior,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.register(LeafKind::Condition, name, move || {
            Box::new(Leaf::condition(make())) as Box<dyn Node>
        })
    }

    /// Registers any node under `name` in the unified namespace.
    pub fn register_node<F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Node> + Send + Sync + 'static,
    {
        let name = checked_name(name)?;
        if self.nodes.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(%name, "replaced registered node factory");
        }
        Ok(())
    }

    /// Instantiates `name` from the `kind` namespace, falling back to the
    /// unified namespace. Unknown names yield `None`.
    pub fn create(&self, kind: LeafKind, name: &str) -> Option<Box<dyn Node>> {
        self.namespace(kind)
            .get(name)
            .or_else(|| self.nodes.get(name))
            .map(|factory| factory())
    }

    /// Instantiates `name` from the unified namespace only.
    pub fn create_node(&self, name: &str) -> Option<Box<dyn Node>> {
        self.nodes.get(name).map(|factory| factory())
    }

    pub fn contains(&self, kind: LeafKind, name: &str) -> bool {
        self.namespace(kind).contains_key(name) || self.nodes.contains_key(name)
    }

    /// Names registered directly in the `kind` namespace, sorted.
    pub fn names(&self, kind: LeafKind) -> Vec<&str> {
        self.namespace(kind).keys().map(String::as_str).collect()
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len() + self.conditions.len() + self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn namespace(&self, kind: LeafKind) -> &BTreeMap<String, NodeFactory> {
        match kind {
            LeafKind::Action => &self.actions,
            LeafKind::Condition => &self.conditions,
        }
    }

    fn insert_builtin<B, F>(&mut self, kind: LeafKind, name: &str, make: F)
    where
        B: LeafBehavior,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.namespace_mut(kind).insert(name.to_string(), leaf_factory(kind, make));
    }

    fn namespace_mut(&mut self, kind: LeafKind) -> &mut BTreeMap<String, NodeFactory> {
        match kind {
            LeafKind::Action => &mut self.actions,
            LeafKind::Condition => &mut self.conditions,
        }
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("actions", &self.names(LeafKind::Action))
            .field("conditions", &self.names(LeafKind::Condition))
            .field("nodes", &self.node_names())
            .finish()
    }
}

fn checked_name(name: impl Into<String>) -> Result<String, RegistryError> {
    let name = name.into();
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    Ok(name)
}

fn leaf_factory<B, F>(kind: LeafKind, make: F) -> NodeFactory
where
    B: LeafBehavior,
    F: Fn() -> B + Send + Sync + 'static,
{
    Arc::new(move || Box::new(Leaf::new(kind, make())) as Box<dyn Node>)
}
