use core::fmt;
use std::any::Any;
use std::sync::Arc;

/// Opaque handle to the agent that owns a tree.
///
/// The kernel never inspects the agent; leaves downcast it to whatever host
/// type they expect (a component lookup, an entity id, a world proxy).
#[derive(Clone)]
pub struct AgentHandle {
    label: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl AgentHandle {
    pub fn new<T: Any + Send + Sync>(label: impl Into<Arc<str>>, agent: T) -> Self {
        Self {
            label: label.into(),
            inner: Arc::new(agent),
        }
    }

    pub fn from_arc<T: Any + Send + Sync>(label: impl Into<Arc<str>>, agent: Arc<T>) -> Self {
        Self {
            label: label.into(),
            inner: agent,
        }
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// `true` when both handles refer to the same agent allocation.
    pub fn same_agent(&self, other: &AgentHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentHandle")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
