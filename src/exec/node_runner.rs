// src/exec/node_runner.rs

//! Runs a single node's shell command.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::{NodeOutcome, RuntimeEvent, ScheduledNode};

/// Run one node and report a `NodeCompleted` event.
///
/// Spawn failures are reported as `Failed(-1)` so the runtime is never left
/// waiting on a node that cannot run.
pub async fn run_node(node: ScheduledNode, runtime_tx: mpsc::Sender<RuntimeEvent>) {
    let name = node.name.clone();
    let outcome = match run_node_inner(&node).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(node = %name, error = %err, "node execution error");
            NodeOutcome::Failed(-1)
        }
    };

    if runtime_tx
        .send(RuntimeEvent::NodeCompleted {
            node: name.clone(),
            outcome,
        })
        .await
        .is_err()
    {
        debug!(node = %name, "runtime gone before completion could be reported");
    }
}

async fn run_node_inner(node: &ScheduledNode) -> Result<NodeOutcome> {
    let Some(cmd_line) = node.cmd.as_deref() else {
        debug!(node = %node.name, "no command; completing immediately");
        return Ok(NodeOutcome::Success);
    };

    info!(node = %node.name, cmd = %cmd_line, "starting node process");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for node '{}'", node.name))?;

    if let Some(stdout) = child.stdout.take() {
        let name = node.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(node = %name, "{}", line);
            }
        });
    }

    // Always consume stderr so buffers don't fill.
    if let Some(stderr) = child.stderr.take() {
        let name = node.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(node = %name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of node '{}'", node.name))?;

    let code = status.code().unwrap_or(-1);
    info!(
        node = %node.name,
        exit_code = code,
        success = status.success(),
        "node process exited"
    );

    Ok(if status.success() {
        NodeOutcome::Success
    } else {
        NodeOutcome::Failed(code)
    })
}
