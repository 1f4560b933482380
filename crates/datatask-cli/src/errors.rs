//! Error display using miette for contextual error reporting
//!
//! JSON syntax errors are shown against the description text with the failing
//! position labelled; validation errors keep the library's own diagnostic code
//! and help.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to {operation} {}", path.display())]
    #[diagnostic(
        code(datatask::cli::file_error),
        help("Check file permissions and ensure the path exists")
    )]
    FileError {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse task description {input}")]
    #[diagnostic(code(datatask::cli::parse_error))]
    ParseError {
        input: String,
        #[source_code]
        src: String,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("Task description {input} is invalid")]
    #[diagnostic(code(datatask::cli::invalid_task))]
    InvalidTask {
        input: String,
        #[source]
        #[diagnostic_source]
        source: datatask::Error,
    },

    #[error("Failed to encode the canonical description")]
    #[diagnostic(code(datatask::cli::encode_error))]
    EncodeError {
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileError {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Wrap a normalization failure of the description `src` read from `input`.
    pub fn from_task_error(input: impl Into<String>, src: String, error: datatask::Error) -> Self {
        match error {
            datatask::Error::Parse {
                message,
                line,
                column,
            } => {
                let offset = byte_offset(&src, line, column);
                Self::ParseError {
                    input: input.into(),
                    src,
                    span: SourceSpan::from((offset, 0)),
                    message,
                }
            }
            other => Self::InvalidTask {
                input: input.into(),
                source: other,
            },
        }
    }
}

/// Byte offset of a one-based line and column, clamped to the text.
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;
