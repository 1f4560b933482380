use datatask::{ColumnRef, Normalizer, Task};
use tracing::instrument;

use super::{Input, load_task};
use crate::errors::CliResult;

#[instrument(skip(normalizer))]
pub fn execute_lineage(input: &Input, normalizer: &Normalizer) -> CliResult<String> {
    let task = load_task(input, normalizer)?;
    Ok(format_lineage(&task))
}

fn describe_source(task: &Task, column: &ColumnRef) -> String {
    match task.column_name(column) {
        Some(name) => format!("{column} ({name})"),
        None => column.to_string(),
    }
}

/// One block per output, one line per output column:
///
/// ```text
/// report.csv
///   [1] cost <- inventory.csv[1] (quantity), inventory.csv[2] (price)
/// ```
pub fn format_lineage(task: &Task) -> String {
    let mut lines = Vec::new();
    for (locator, output) in task.outputs() {
        let columns = output.lineage();
        lines.push(locator.clone());
        if columns.is_empty() {
            lines.push("  (no columns)".to_string());
        }
        for column in columns {
            let sources = column
                .sources
                .iter()
                .map(|source| describe_source(task, source))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(match column.name {
                Some(name) => format!("  [{}] {name} <- {sources}", column.position),
                None => format!("  [{}] <- {sources}", column.position),
            });
        }
    }
    lines.join("\n")
}
