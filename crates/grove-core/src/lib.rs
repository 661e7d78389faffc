//! Tick-driven behavior tree kernel primitives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod status;
pub mod tick;

pub use agent::AgentHandle;
pub use blackboard::{BbKey, Blackboard};
pub use status::Status;
pub use tick::{Clock, ManualClock, SystemClock, TickContext};
