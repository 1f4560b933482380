//! Normalized input resources and column lookup.

use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::spec::ResourceSpec;
use crate::value::RawValue;

/// One declared column of an input resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputColumn {
    /// A named column
    Name(String),
    /// An unnamed column, declared by position only
    Index(usize),
}

impl InputColumn {
    /// The column name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    pub(crate) fn to_raw(&self) -> RawValue {
        match self {
            Self::Name(name) => RawValue::from(name.as_str()),
            Self::Index(index) => RawValue::from(*index),
        }
    }
}

/// Selects one column of a resource, by name or by zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Exact, case-sensitive column name
    Name(String),
    /// Zero-based column position
    Index(usize),
}

impl ColumnSelector {
    /// Read a selector from a string or non-negative integer.
    #[must_use]
    pub fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::String(name) => Some(Self::Name(name.clone())),
            other => other.as_index().map(Self::Index),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Index(index) => write!(f, "at position {index}"),
        }
    }
}

/// An input resource after normalization: its declared columns and whether
/// the physical resource starts with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputResource {
    schema: Vec<InputColumn>,
    header: bool,
}

impl InputResource {
    /// Normalize the schema of an input specification.
    pub(crate) fn from_spec(spec: &ResourceSpec<'_>, locator: &str) -> Result<Self> {
        let mut schema = Vec::with_capacity(spec.schema.len());
        let mut names = HashSet::new();

        for (position, entry) in spec.schema.iter().enumerate() {
            let entry_path = spec.schema_path.index(position);
            let column = match ColumnSelector::from_raw(entry) {
                Some(ColumnSelector::Name(name)) => {
                    if !names.insert(name.clone()) {
                        return Err(Error::DuplicateColumn {
                            path: entry_path,
                            resource: locator.to_string(),
                            column: name,
                        });
                    }
                    InputColumn::Name(name)
                }
                Some(ColumnSelector::Index(index)) if index == position => {
                    InputColumn::Index(index)
                }
                Some(ColumnSelector::Index(_)) => {
                    return Err(Error::malformed_descriptor(
                        &entry_path,
                        entry,
                        format!("an unnamed column must be declared by its own position, {position}"),
                    ));
                }
                None => {
                    return Err(Error::malformed_descriptor(
                        &entry_path,
                        entry,
                        "input columns are declared by name or by position",
                    ));
                }
            };
            schema.push(column);
        }

        Ok(Self {
            schema,
            header: spec.header,
        })
    }

    /// Declared columns, in order.
    #[must_use]
    pub fn schema(&self) -> &[InputColumn] {
        &self.schema
    }

    /// Whether row 0 of the resource is a header row.
    #[must_use]
    pub const fn header(&self) -> bool {
        self.header
    }

    /// Resolve a selector to a position in the schema.
    #[must_use]
    pub fn position(&self, selector: &ColumnSelector) -> Option<usize> {
        match selector {
            ColumnSelector::Index(index) => (*index < self.schema.len()).then_some(*index),
            ColumnSelector::Name(name) => self
                .schema
                .iter()
                .position(|column| column.name() == Some(name.as_str())),
        }
    }

    /// Name of the column at `position`, if it is named.
    #[must_use]
    pub fn column_name(&self, position: usize) -> Option<&str> {
        self.schema.get(position).and_then(InputColumn::name)
    }
}
