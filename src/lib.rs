// src/lib.rs

//! Incremental topological scheduling for dependency graphs.
//!
//! The core lives in [`dag`]: build a [`dag::Scheduler`] with `add`, freeze
//! it with `prepare`, then pull ready batches with `get_ready` and report
//! completions with `done`. Everything else in this crate is one caller of
//! that protocol: a TOML manifest loader ([`config`]), an async runtime that
//! executes node commands ([`engine`], [`exec`]) and the `toposched` CLI.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::{Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::GraphFile;
use crate::config::loader::load_and_validate;
use crate::engine::{Runtime, RuntimeEvent};
use crate::exec::CommandExecutor;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let graph = load_and_validate(&config_path)?;
    debug!(path = %config_path.display(), nodes = graph.node.len(), "manifest loaded");

    match args.command {
        Command::Order => {
            for node in graph.to_scheduler().static_order()? {
                println!("{node}");
            }
        }
        Command::Batches => {
            for batch in graph.to_scheduler().static_batches()? {
                println!("{}", batch.join(" "));
            }
        }
        Command::Check => {
            graph.to_scheduler().prepare()?;
            println!("ok: {} nodes, no cycles", graph.node.len());
        }
        Command::Run { jobs } => run_graph(graph, jobs).await?,
    }

    Ok(())
}

async fn run_graph(mut graph: GraphFile, jobs: Option<usize>) -> Result<()> {
    if let Some(jobs) = jobs {
        if jobs == 0 {
            bail!("--jobs must be >= 1");
        }
        graph.config.max_parallel = jobs;
    }

    let capacity = graph.config.max_parallel.max(64);
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(capacity);
    let executor = CommandExecutor::new(rt_tx.clone());

    // Ctrl-C: stop starting nodes and wait for the ones in flight.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::from_graph(&graph, rt_rx, executor);
    let report = runtime.run().await?;

    if report.is_success() {
        info!(completed = report.completed.len(), "all nodes completed");
        return Ok(());
    }

    for (node, code) in &report.failed {
        eprintln!("failed: {node} (exit code {code})");
    }
    for node in &report.skipped {
        eprintln!("skipped: {node}");
    }
    bail!(
        "run incomplete: {} failed, {} skipped",
        report.failed.len(),
        report.skipped.len()
    )
}
