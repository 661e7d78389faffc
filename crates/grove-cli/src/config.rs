//! Run configuration, loaded from `grove.yaml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grove_core::Blackboard;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "grove.yaml";

/// Settings for `grove run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Upper bound on ticks executed
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Pause between ticks in milliseconds
    pub tick_interval_ms: u64,

    /// Stop at the first Success/Failure of the root
    #[serde(default = "default_stop_on_terminal")]
    pub stop_on_terminal: bool,

    /// Initial blackboard contents
    pub blackboard: BTreeMap<String, BlackboardValue>,
}

/// Scalar seeded into the blackboard. Integers are stored as `i64`, other
/// numbers as `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlackboardValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl BlackboardValue {
    pub fn store(&self, blackboard: &mut Blackboard, key: &str) {
        match self {
            BlackboardValue::Bool(b) => blackboard.set(key, *b),
            BlackboardValue::Integer(n) => blackboard.set(key, *n),
            BlackboardValue::Float(n) => blackboard.set(key, *n),
            BlackboardValue::Text(s) => blackboard.set(key, s.clone()),
        }
    }
}

fn default_max_ticks() -> u64 {
    100
}

fn default_stop_on_terminal() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            tick_interval_ms: 0,
            stop_on_terminal: default_stop_on_terminal(),
            blackboard: BTreeMap::new(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Uses `explicit` when given, otherwise `grove.yaml` next to the tree
    /// file, otherwise defaults.
    pub fn discover(tree_file: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let beside = sibling_config(tree_file);
        if beside.exists() {
            tracing::debug!(config = %beside.display(), "using run configuration");
            Self::load(&beside)
        } else {
            Ok(Self::default())
        }
    }

    pub fn seed(&self, blackboard: &mut Blackboard) {
        for (key, value) in &self.blackboard {
            value.store(blackboard, key);
        }
    }
}

fn sibling_config(tree_file: &Path) -> PathBuf {
    tree_file
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIG_FILE_NAME)
}
