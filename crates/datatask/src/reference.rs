//! Symbolic resource references.

use indexmap::IndexMap;

use crate::descriptor::OPERATOR_SIGIL;
use crate::error::{Error, Result};
use crate::path::DescriptorPath;
use crate::value::RawValue;

/// Mapping from short symbolic references to literal resource locators.
///
/// The table is not exhaustive: a reference without an entry stands for
/// itself. Lookups are single-step, a locator is never looked up again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: IndexMap<String, String>,
}

impl ReferenceTable {
    /// Build the table from the raw `resources` value, if there is one.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a mapping of strings to strings, or if a
    /// reference is declared twice.
    pub fn from_raw(raw: Option<&RawValue>, path: &DescriptorPath) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let entries = raw.as_mapping().ok_or_else(|| {
            Error::invalid_structure(
                path,
                "a mapping from resource references to paths or URIs",
                raw.kind(),
            )
        })?;

        let mut table = IndexMap::with_capacity(entries.len());
        for (reference, locator) in entries {
            let entry_path = path.key(reference);
            let Some(locator) = locator.as_str() else {
                return Err(Error::invalid_structure(
                    &entry_path,
                    "a path or URI string",
                    locator.kind(),
                ));
            };
            if table.contains_key(reference) {
                return Err(Error::DuplicateReference {
                    path: entry_path,
                    reference: reference.clone(),
                });
            }
            table.insert(reference.clone(), locator.to_string());
        }

        tracing::trace!(references = table.len(), "Built reference table");
        Ok(Self { entries: table })
    }

    /// Resolve a reference to its locator, falling back to the reference itself.
    #[must_use]
    pub fn resolve<'a>(&'a self, reference: &'a str) -> &'a str {
        self.entries.get(reference).map_or(reference, String::as_str)
    }

    /// The locator declared for `reference`, if any.
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<&str> {
        self.entries.get(reference).map(String::as_str)
    }

    /// Whether `reference` has a declared entry.
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    /// The key a column descriptor can use to name `locator`.
    ///
    /// A locator names itself unless it starts with the operator sigil or is
    /// also a reference to a different locator. Otherwise the first reference
    /// to it without the sigil is used. `None` when no key resolves to it.
    #[must_use]
    pub fn descriptor_key<'a>(&'a self, locator: &'a str) -> Option<&'a str> {
        let names_itself = !locator.starts_with(OPERATOR_SIGIL)
            && self.get(locator).is_none_or(|target| target == locator);
        if names_itself {
            return Some(locator);
        }
        self.entries
            .iter()
            .find(|(reference, target)| {
                target.as_str() == locator && !reference.starts_with(OPERATOR_SIGIL)
            })
            .map(|(reference, _)| reference.as_str())
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of declared references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no reference is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
