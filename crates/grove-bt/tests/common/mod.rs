#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use grove_bt::{Leaf, LeafBehavior, Node};
use grove_core::{AgentHandle, Blackboard, Status, TickContext};

/// Shared counters a test keeps after handing the leaf to a tree.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    ticks: Arc<AtomicUsize>,
    resets: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
}

impl Probe {
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

/// Returns `script[n]` on its n-th tick and repeats the last entry after
/// that. Resets do not rewind the script.
pub struct Scripted {
    script: Vec<Status>,
    cursor: usize,
    probe: Probe,
}

impl LeafBehavior for Scripted {
    fn tick(&mut self, _: &TickContext, _: Option<&AgentHandle>, _: &mut Blackboard) -> Status {
        self.probe.ticks.fetch_add(1, Ordering::SeqCst);
        let status = self.script[self.cursor.min(self.script.len() - 1)];
        self.cursor += 1;
        status
    }

    fn reset(&mut self) {
        self.probe.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn on_condition_failed(&mut self) {
        self.probe.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn scripted(script: &[Status]) -> (Box<dyn Node>, Probe) {
    assert!(!script.is_empty());
    let probe = Probe::default();
    let leaf = Leaf::action(Scripted {
        script: script.to_vec(),
        cursor: 0,
        probe: probe.clone(),
    });
    (Box::new(leaf), probe)
}

pub fn always(status: Status) -> (Box<dyn Node>, Probe) {
    scripted(&[status])
}

pub fn ctx(tick: u64, now: f64) -> TickContext {
    TickContext::new(tick, now)
}
