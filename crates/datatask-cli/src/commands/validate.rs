use datatask::{Normalizer, Task};
use tracing::instrument;

use super::{Input, load_task};
use crate::errors::CliResult;

/// Normalize a description and summarize it on one line
#[instrument(skip(normalizer))]
pub fn execute_validate(input: &Input, normalizer: &Normalizer) -> CliResult<String> {
    let task = load_task(input, normalizer)?;
    let summary = summarize(&task);
    tracing::info!(%summary, "Task description is valid");
    Ok(format!("{input}: {summary}"))
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

pub fn summarize(task: &Task) -> String {
    let columns: usize = task.outputs().values().map(|o| o.schema().len()).sum();
    format!(
        "valid ({}, {}, {})",
        plural(task.inputs().len(), "input"),
        plural(task.outputs().len(), "output"),
        plural(columns, "output column"),
    )
}
