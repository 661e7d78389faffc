//! Umbrella crate that re-exports the `grove-*` building blocks.
//!
//! ```ignore
//! use grove::bt::{BehaviorTree, NodeRegistry};
//! use grove::core::Blackboard;
//! use grove::tools::NullSink;
//!
//! let registry = NodeRegistry::with_builtins();
//! let root = grove::dsl::parse(source, &registry, &mut NullSink)?;
//! let mut tree = BehaviorTree::with_system_clock(root);
//! let mut blackboard = Blackboard::new();
//! let status = tree.tick(&mut blackboard);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use grove_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use grove_tools as tools;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use grove_bt as bt;

#[cfg(feature = "dsl")]
#[cfg_attr(docsrs, doc(cfg(feature = "dsl")))]
pub use grove_dsl as dsl;
