// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::dag::Scheduler;
use crate::errors::{Result, ToposchedError};

impl TryFrom<RawGraphFile> for GraphFile {
    type Error = ToposchedError;

    fn try_from(raw: RawGraphFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_graph(&raw)?;
        Ok(GraphFile::new_unchecked(raw.config, raw.node))
    }
}

impl GraphFile {
    /// Feed every node into a fresh scheduler, in file order.
    ///
    /// The scheduler is returned unprepared; cycles (including a node listed
    /// in its own `after`) surface from [`Scheduler::prepare`].
    pub fn to_scheduler(&self) -> Scheduler<String> {
        let mut scheduler = Scheduler::new();
        for node in &self.node {
            // A fresh scheduler is never frozen.
            let _ = scheduler.add(node.name.clone(), node.after.iter().cloned());
        }
        scheduler
    }
}

fn validate_raw_graph(cfg: &RawGraphFile) -> Result<()> {
    ensure_has_nodes(cfg)?;
    validate_global_config(cfg)?;
    validate_node_names(cfg)?;
    validate_node_dependencies(cfg)?;
    Ok(())
}

fn ensure_has_nodes(cfg: &RawGraphFile) -> Result<()> {
    if cfg.node.is_empty() {
        return Err(ToposchedError::ConfigError(
            "graph must contain at least one [[node]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawGraphFile) -> Result<()> {
    if cfg.config.max_parallel == 0 {
        return Err(ToposchedError::ConfigError(
            "[config].max_parallel must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_node_names(cfg: &RawGraphFile) -> Result<()> {
    let mut seen = HashSet::new();
    for node in &cfg.node {
        if node.name.trim().is_empty() {
            return Err(ToposchedError::ConfigError(
                "node name must not be empty".to_string(),
            ));
        }
        if !seen.insert(node.name.as_str()) {
            return Err(ToposchedError::ConfigError(format!(
                "node '{}' is declared more than once",
                node.name
            )));
        }
    }
    Ok(())
}

fn validate_node_dependencies(cfg: &RawGraphFile) -> Result<()> {
    let names: HashSet<&str> = cfg.node.iter().map(|n| n.name.as_str()).collect();
    for node in &cfg.node {
        for dep in &node.after {
            if !names.contains(dep.as_str()) {
                return Err(ToposchedError::ConfigError(format!(
                    "node '{}' has unknown dependency '{}' in `after`",
                    node.name, dep
                )));
            }
        }
    }
    Ok(())
}
