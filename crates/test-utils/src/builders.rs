#![allow(dead_code)]

use toposched::config::{ConfigSection, GraphFile, NodeConfig, RawGraphFile};
use toposched::types::FailurePolicy;

/// Builder for `GraphFile` to simplify test setup.
pub struct GraphFileBuilder {
    graph: RawGraphFile,
}

impl GraphFileBuilder {
    pub fn new() -> Self {
        Self {
            graph: RawGraphFile {
                config: ConfigSection::default(),
                node: Vec::new(),
            },
        }
    }

    pub fn with_node(mut self, node: NodeConfig) -> Self {
        self.graph.node.push(node);
        self
    }

    pub fn max_parallel(mut self, n: usize) -> Self {
        self.graph.config.max_parallel = n;
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.graph.config.on_failure = policy;
        self
    }

    /// The unvalidated manifest, for tests that exercise validation.
    pub fn raw(self) -> RawGraphFile {
        self.graph
    }

    pub fn build(self) -> GraphFile {
        GraphFile::try_from(self.graph).expect("Failed to build valid graph from builder")
    }
}

impl Default for GraphFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `NodeConfig`.
pub struct NodeConfigBuilder {
    node: NodeConfig,
}

impl NodeConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            node: NodeConfig {
                name: name.to_string(),
                cmd: None,
                after: vec![],
            },
        }
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.node.cmd = Some(cmd.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.node.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> NodeConfig {
        self.node
    }
}
