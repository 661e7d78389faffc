//! Tick-resumable behavior tree nodes on top of `grove-core`.
//!
//! Nodes own their children and are advanced one tick at a time through
//! [`Node::execute`]. A composite whose child reports `Running` resumes that
//! child on the next tick; every node resets its progress when it finishes.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod leaves;
pub mod node;
pub mod registry;
pub mod snapshot;
pub mod tree;

pub use composite::{Parallel, Selector, Sequence};
pub use decorator::{Inverter, Repeat, Retry, Timeout};
pub use leaf::{FnBehavior, Leaf, LeafBehavior, LeafKind, Predicate};
pub use node::{Node, NodeCategory, NodeCore, NodeId, NodeKind, PropertyValue};
pub use registry::{NodeFactory, NodeRegistry, RegistryError};
pub use snapshot::NodeSnapshot;
pub use tree::BehaviorTree;
