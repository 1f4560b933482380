use std::path::Path;

use datatask::Normalizer;
use tracing::instrument;

use super::{Input, load_task};
use crate::errors::{CliError, CliResult};

/// Produce the canonical encoding of a description.
///
/// Returns the text to print, or `None` when it was written to `output`.
#[instrument(skip(normalizer))]
pub fn execute_normalize(
    input: &Input,
    pretty: bool,
    output: Option<&Path>,
    normalizer: &Normalizer,
) -> CliResult<Option<String>> {
    let task = load_task(input, normalizer)?;
    let encoded = if pretty {
        task.to_json_pretty()
    } else {
        task.to_json()
    }
    .map_err(|source| CliError::EncodeError { source })?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{encoded}\n"))
                .map_err(|e| CliError::file_error("write", path, e))?;
            tracing::info!(path = %path.display(), bytes = encoded.len(), "Wrote canonical description");
            Ok(None)
        }
        None => Ok(Some(encoded)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_task(dir: &Path, json: &str) -> Input {
        let path = dir.join("task.json");
        std::fs::write(&path, json).unwrap();
        Input::File(path)
    }

    #[test]
    fn test_normalize_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_task(
            dir.path(),
            r#"{"resources": {"t": "t.csv"}, "inputs": {"t": ["a"]}, "outputs": {"o.csv": [{"t": "a"}]}}"#,
        );
        let text = execute_normalize(&input, false, None, &Normalizer::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            text,
            r#"{"resources":{"t":"t.csv"},"inputs":{"t.csv":{"schema":["a"],"header":false}},"outputs":{"o.csv":{"schema":[{"t.csv":0}],"header":false}}}"#
        );
    }

    #[test]
    fn test_normalize_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_task(dir.path(), r#"{"inputs": ["a.csv"]}"#);
        let target = dir.path().join("canonical.json");

        let printed =
            execute_normalize(&input, true, Some(&target), &Normalizer::default()).unwrap();
        assert!(printed.is_none());

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.contains("\"a.csv\""));
        assert!(datatask::decode(&written).is_ok());
    }
}
