pub mod lineage;
pub mod normalize;
pub mod validate;
pub mod version;

use std::convert::Infallible;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use datatask::{Normalizer, Task};
use tracing::instrument;

use crate::errors::{CliError, CliResult};

/// Where a task description is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl FromStr for Input {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(s))
        })
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Input {
    /// Read the whole description text
    pub fn read(&self) -> CliResult<String> {
        match self {
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|e| CliError::file_error("read", "<stdin>", e))?;
                Ok(text)
            }
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(|e| CliError::file_error("read", path, e))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Version,
    Validate {
        input: Input,
    },
    Normalize {
        input: Input,
        pretty: bool,
        output: Option<PathBuf>,
    },
    Lineage {
        input: Input,
    },
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Validate { .. } => "validate",
            Self::Normalize { .. } => "normalize",
            Self::Lineage { .. } => "lineage",
        }
    }
}

/// Read and normalize a task description
#[instrument(skip_all, fields(input = %input))]
pub fn load_task(input: &Input, normalizer: &Normalizer) -> CliResult<Task> {
    let text = input.read()?;
    tracing::debug!(bytes = text.len(), "Read task description");

    match normalizer.decode(&text) {
        Ok(task) => Ok(task),
        Err(error) => {
            tracing::debug!(error = %error, "Task description rejected");
            Err(CliError::from_task_error(input.to_string(), text, error))
        }
    }
}
