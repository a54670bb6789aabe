// src/config/model.rs

use serde::Deserialize;

use crate::types::FailurePolicy;

/// Graph manifest as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// max_parallel = 4
/// on_failure = "abort"
///
/// [[node]]
/// name = "fetch"
///
/// [[node]]
/// name = "build"
/// cmd = "make"
/// after = ["fetch"]
/// ```
///
/// Nodes are an array of tables so that file order is preserved; it becomes
/// the scheduler's insertion order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub node: Vec<NodeConfig>,
}

/// Validated graph manifest.
///
/// Construct via `GraphFile::try_from(raw)` or
/// [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct GraphFile {
    pub config: ConfigSection,
    pub node: Vec<NodeConfig>,
}

impl GraphFile {
    /// Build without validation. Callers must have validated `node`.
    pub(crate) fn new_unchecked(config: ConfigSection, node: Vec<NodeConfig>) -> Self {
        Self { config, node }
    }

    pub fn node(&self, name: &str) -> Option<&NodeConfig> {
        self.node.iter().find(|n| n.name == name)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.node.iter().map(|n| n.name.as_str())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of node commands running at once.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// `"abort"` (default) or `"continue"`.
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

fn default_max_parallel() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            on_failure: FailurePolicy::default(),
        }
    }
}

/// One `[[node]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub name: String,

    /// Shell command to run for this node; nodes without one are pure
    /// ordering points and complete immediately.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Nodes that must be done before this one may start.
    #[serde(default)]
    pub after: Vec<String>,
}
