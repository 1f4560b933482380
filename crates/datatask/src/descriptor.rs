//! Typed column descriptors.
//!
//! A raw schema entry of an output is lifted into a [`ColumnDescriptor`] by a
//! single discriminating step, [`ColumnDescriptor::parse`]. The resolver only
//! ever matches on the typed variants.

use crate::error::{Error, Result};
use crate::path::DescriptorPath;
use crate::schema::ColumnSelector;
use crate::value::RawValue;

/// Prefix reserved for operator names.
pub const OPERATOR_SIGIL: char = '$';

/// What a descriptor parser needs to know about declared resources.
///
/// Whether a single-key mapping is a cross-resource reference or an alias
/// depends on the declared resources, not on syntax.
pub trait ResourceScope {
    /// Whether `reference` resolves to a declared input resource.
    fn is_input(&self, reference: &str) -> bool;

    /// Whether `reference` has an entry in the reference table.
    fn is_declared(&self, reference: &str) -> bool;
}

/// One column descriptor, classified but not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDescriptor<'a> {
    /// A column of the home resource, by name
    ColumnName(&'a str),
    /// A column of the home resource, by position
    ColumnIndex(usize),
    /// `{resource: column}`
    CrossResourceRef {
        /// The reference as written
        resource: &'a str,
        /// Column of that resource
        column: ColumnSelector,
    },
    /// `{name: descriptor}`
    Alias {
        /// Output column name
        name: &'a str,
        /// The raw descriptor being named
        child: &'a RawValue,
    },
    /// `{"$operator": [descriptor, ...]}`
    OperatorApp {
        /// The key as written, sigil included
        key: &'a str,
        /// Operator name without the sigil
        operator: &'a str,
        /// Raw argument descriptors; never empty
        args: &'a [RawValue],
    },
}

impl<'a> ColumnDescriptor<'a> {
    /// Classify a raw descriptor.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedColumnDescriptor`] for shapes that are not descriptors
    /// - [`Error::MalformedOperator`] for operator keys without a non-empty argument sequence
    /// - [`Error::UnknownResource`] for `{resource: column}` where the resource is not an input
    pub fn parse(
        raw: &'a RawValue,
        scope: &impl ResourceScope,
        path: &DescriptorPath,
    ) -> Result<Self> {
        match raw {
            RawValue::String(name) => Ok(Self::ColumnName(name)),
            RawValue::Number(_) => raw.as_index().map(Self::ColumnIndex).ok_or_else(|| {
                Error::malformed_descriptor(
                    path,
                    raw,
                    "column positions must be non-negative integers",
                )
            }),
            RawValue::Mapping(entries) => match entries.as_slice() {
                [(key, value)] => Self::parse_entry(raw, key, value, scope, path),
                _ => Err(Error::malformed_descriptor(
                    path,
                    raw,
                    format!("expected a single-key mapping, found {} keys", entries.len()),
                )),
            },
            RawValue::Null | RawValue::Bool(_) | RawValue::Sequence(_) => {
                Err(Error::malformed_descriptor(
                    path,
                    raw,
                    format!("a {} is not a column descriptor", raw.kind()),
                ))
            }
        }
    }

    fn parse_entry(
        raw: &'a RawValue,
        key: &'a str,
        value: &'a RawValue,
        scope: &impl ResourceScope,
        path: &DescriptorPath,
    ) -> Result<Self> {
        if let Some(operator) = key.strip_prefix(OPERATOR_SIGIL) {
            let operator_path = path.key(key);
            if operator.is_empty() {
                return Err(Error::malformed_operator(
                    &operator_path,
                    key,
                    "operator name is empty",
                ));
            }
            let args = value.as_sequence().ok_or_else(|| {
                Error::malformed_operator(
                    &operator_path,
                    key,
                    format!("arguments must be a sequence, found {}", value.kind()),
                )
            })?;
            if args.is_empty() {
                return Err(Error::malformed_operator(
                    &operator_path,
                    key,
                    "at least one argument is required",
                ));
            }
            return Ok(Self::OperatorApp {
                key,
                operator,
                args,
            });
        }

        if scope.is_input(key) {
            let column = ColumnSelector::from_raw(value).ok_or_else(|| {
                Error::malformed_descriptor(
                    path,
                    raw,
                    format!("a reference to '{key}' must select a column by name or position"),
                )
            })?;
            return Ok(Self::CrossResourceRef {
                resource: key,
                column,
            });
        }

        let selects_column = matches!(value, RawValue::String(_) | RawValue::Number(_));
        if selects_column || scope.is_declared(key) {
            return Err(Error::unknown_resource(&path.key(key), key));
        }

        Ok(Self::Alias { name: key, child: value })
    }
}
