// tests/command_executor.rs
#![cfg(unix)]

mod common;
use crate::common::builders::{GraphFileBuilder, NodeConfigBuilder};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;

use tempfile::tempdir;
use tokio::sync::mpsc;

use toposched::engine::{Runtime, RuntimeEvent};
use toposched::exec::CommandExecutor;
use toposched::types::FailurePolicy;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn shell_commands_run_after_their_dependencies() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let log = dir.path().join("log.txt");
    let append = |s: &str| format!("echo {s} >> '{}'", log.display());

    let graph = GraphFileBuilder::new()
        .max_parallel(4)
        .with_node(NodeConfigBuilder::new("first").cmd(&append("first")).build())
        .with_node(NodeConfigBuilder::new("marker").after("first").build())
        .with_node(
            NodeConfigBuilder::new("second")
                .after("marker")
                .cmd(&append("second"))
                .build(),
        )
        .build();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let report = with_timeout(Runtime::from_graph(&graph, rx, CommandExecutor::new(tx)).run()).await?;

    assert!(report.is_success());
    assert_eq!(report.completed, vec!["first", "marker", "second"]);
    assert_eq!(std::fs::read_to_string(&log)?, "first\nsecond\n");
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_with_its_code() -> TestResult {
    init_tracing();

    let graph = GraphFileBuilder::new()
        .on_failure(FailurePolicy::Continue)
        .with_node(NodeConfigBuilder::new("bad").cmd("exit 3").build())
        .with_node(NodeConfigBuilder::new("after_bad").after("bad").cmd("true").build())
        .with_node(NodeConfigBuilder::new("good").cmd("true").build())
        .build();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let report = with_timeout(Runtime::from_graph(&graph, rx, CommandExecutor::new(tx)).run()).await?;

    assert_eq!(report.failed, vec![("bad".to_string(), 3)]);
    assert_eq!(report.completed, vec!["good"]);
    assert_eq!(report.skipped, vec!["after_bad"]);
    Ok(())
}
