//! Error types for task normalization
//!
//! Every error is a validation failure of the raw description. None of them is
//! transient: normalization stops at the first one and the description has to
//! be corrected.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::path::DescriptorPath;

/// Errors raised while normalizing a task description
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A column descriptor does not match any recognized shape
    #[error("Malformed column descriptor at {path}: {reason} (found {fragment})")]
    #[diagnostic(
        code(datatask::descriptor::malformed),
        help(
            "A column descriptor is a column name, a column position, {{resource: column}}, {{name: descriptor}} or {{\"$operator\": [descriptor, ...]}}"
        )
    )]
    MalformedColumnDescriptor {
        /// Location of the descriptor
        path: DescriptorPath,
        /// Compact JSON rendering of the offending fragment
        fragment: String,
        /// What is wrong with it
        reason: String,
    },

    /// An operator application has no usable argument list
    #[error("Malformed operator '{operator}' at {path}: {reason}")]
    #[diagnostic(
        code(datatask::operator::malformed),
        help("Operator arguments must be a non-empty sequence of column descriptors")
    )]
    MalformedOperator {
        /// Location of the operator application
        path: DescriptorPath,
        /// Operator key as written, including the `$` sigil
        operator: String,
        /// What is wrong with it
        reason: String,
    },

    /// A descriptor references a resource that is not declared as an input
    #[error("Unknown resource '{reference}' at {path}")]
    #[diagnostic(
        code(datatask::resource::unknown),
        help("Declare the resource under `inputs` before referencing its columns")
    )]
    UnknownResource {
        /// Location of the reference
        path: DescriptorPath,
        /// The reference as written
        reference: String,
    },

    /// A column selector does not resolve against the resource's schema
    #[error("Unknown column {column} in resource '{resource}' at {path}")]
    #[diagnostic(
        code(datatask::column::unknown),
        help("Columns resolve by exact name or by zero-based position in the input schema")
    )]
    UnknownColumn {
        /// Location of the selector
        path: DescriptorPath,
        /// Locator of the resource that was searched
        resource: String,
        /// The selector that failed to resolve
        column: String,
    },

    /// The same reference is declared twice in one mapping
    #[error("Duplicate reference '{reference}' at {path}")]
    #[diagnostic(code(datatask::reference::duplicate))]
    DuplicateReference {
        /// Location of the second declaration
        path: DescriptorPath,
        /// The repeated reference
        reference: String,
    },

    /// Two input entries resolve to one locator with different specifications
    #[error("Input resource '{locator}' is declared again with a conflicting specification at {path}")]
    #[diagnostic(
        code(datatask::input::duplicate),
        help("Input references that resolve to the same locator must declare the same schema and header")
    )]
    DuplicateInputResource {
        /// Location of the conflicting entry
        path: DescriptorPath,
        /// The shared locator
        locator: String,
    },

    /// Two output entries resolve to one locator
    #[error("Output resource '{locator}' is declared more than once at {path}")]
    #[diagnostic(code(datatask::output::duplicate))]
    DuplicateOutputResource {
        /// Location of the second entry
        path: DescriptorPath,
        /// The shared locator
        locator: String,
    },

    /// An input schema names the same column twice
    #[error("Column '{column}' is declared more than once in input '{resource}' at {path}")]
    #[diagnostic(code(datatask::column::duplicate))]
    DuplicateColumn {
        /// Location of the second declaration
        path: DescriptorPath,
        /// Locator of the input resource
        resource: String,
        /// The repeated column name
        column: String,
    },

    /// Two columns of one output carry the same alias
    #[error("Output column name '{name}' is used more than once in '{resource}' at {path}")]
    #[diagnostic(
        code(datatask::output::duplicate_column),
        help("Give each aliased output column a distinct name")
    )]
    DuplicateOutputColumn {
        /// Location of the second column
        path: DescriptorPath,
        /// Locator of the output resource
        resource: String,
        /// The repeated name
        name: String,
    },

    /// Descriptor nesting exceeds the configured limit
    #[error("Column expression at {path} is nested deeper than the limit of {limit}")]
    #[diagnostic(
        code(datatask::expression::too_deep),
        help("Flatten the expression or raise the maximum depth")
    )]
    ExpressionTooDeep {
        /// Location where the limit was crossed
        path: DescriptorPath,
        /// The configured maximum depth
        limit: usize,
    },

    /// A container in the description has the wrong shape
    #[error("Invalid task description at {path}: expected {expected}, found {found}")]
    #[diagnostic(code(datatask::structure::invalid))]
    InvalidStructure {
        /// Location of the fragment
        path: DescriptorPath,
        /// What was expected there
        expected: String,
        /// What was found instead
        found: String,
    },

    /// Neither inputs nor outputs are declared
    #[error("At least one input or output must be specified")]
    #[diagnostic(code(datatask::task::empty))]
    EmptyTask,

    /// The description text is not valid JSON
    #[error("Failed to parse task description at line {line}, column {column}: {message}")]
    #[diagnostic(code(datatask::parse))]
    Parse {
        /// Parser message
        message: String,
        /// One-based line of the failure
        line: usize,
        /// One-based column of the failure
        column: usize,
    },
}

impl Error {
    /// Create a malformed column descriptor error
    #[must_use]
    pub fn malformed_descriptor(
        path: &DescriptorPath,
        fragment: &crate::RawValue,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedColumnDescriptor {
            path: path.clone(),
            fragment: fragment.render(),
            reason: reason.into(),
        }
    }

    /// Create a malformed operator error
    #[must_use]
    pub fn malformed_operator(
        path: &DescriptorPath,
        operator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedOperator {
            path: path.clone(),
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown resource error
    #[must_use]
    pub fn unknown_resource(path: &DescriptorPath, reference: impl Into<String>) -> Self {
        Self::UnknownResource {
            path: path.clone(),
            reference: reference.into(),
        }
    }

    /// Create an unknown column error
    #[must_use]
    pub fn unknown_column(
        path: &DescriptorPath,
        resource: impl Into<String>,
        column: impl ToString,
    ) -> Self {
        Self::UnknownColumn {
            path: path.clone(),
            resource: resource.into(),
            column: column.to_string(),
        }
    }

    /// Create a structural error from the fragment that was found
    #[must_use]
    pub fn invalid_structure(
        path: &DescriptorPath,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidStructure {
            path: path.clone(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Location of the offending fragment, if the error has one
    #[must_use]
    pub const fn path(&self) -> Option<&DescriptorPath> {
        match self {
            Self::MalformedColumnDescriptor { path, .. }
            | Self::MalformedOperator { path, .. }
            | Self::UnknownResource { path, .. }
            | Self::UnknownColumn { path, .. }
            | Self::DuplicateReference { path, .. }
            | Self::DuplicateInputResource { path, .. }
            | Self::DuplicateOutputResource { path, .. }
            | Self::DuplicateColumn { path, .. }
            | Self::DuplicateOutputColumn { path, .. }
            | Self::ExpressionTooDeep { path, .. }
            | Self::InvalidStructure { path, .. } => Some(path),
            Self::EmptyTask | Self::Parse { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Result type for task normalization
pub type Result<T> = std::result::Result<T, Error>;
