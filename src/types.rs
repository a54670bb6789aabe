use std::str::FromStr;
use serde::Deserialize;

/// What the runtime does when a node's work fails.
///
/// - `Abort`: stop starting new nodes, let in-flight nodes finish, then stop
///   (default behaviour).
/// - `Continue`: keep running every node that does not depend on the failed
///   one. The failed node is never reported done, so its dependents are
///   never released and end up skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(format!(
                "invalid on_failure: {other} (expected \"abort\" or \"continue\")"
            )),
        }
    }
}
