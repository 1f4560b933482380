//! Task normalization and the canonical [`Task`].

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::builder::Normalizer;
use crate::descriptor::OPERATOR_SIGIL;
use crate::error::{Error, Result};
use crate::expr::{ColumnRef, Expr};
use crate::limits::Limits;
use crate::path::DescriptorPath;
use crate::reference::ReferenceTable;
use crate::resolver::Resolver;
use crate::schema::InputResource;
use crate::spec::ResourceSpec;
use crate::value::RawValue;

const RESOURCES_KEY: &str = "resources";
const INPUTS_KEY: &str = "inputs";
const OUTPUTS_KEY: &str = "outputs";

/// An output resource after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputResource {
    schema: Vec<Expr>,
    header: bool,
}

impl OutputResource {
    /// One canonical expression per output column, in order.
    #[must_use]
    pub fn schema(&self) -> &[Expr] {
        &self.schema
    }

    /// Whether the written resource starts with a header row.
    #[must_use]
    pub const fn header(&self) -> bool {
        self.header
    }

    /// For each column, the input columns it is derived from.
    #[must_use]
    pub fn lineage(&self) -> Vec<ColumnLineage<'_>> {
        self.schema
            .iter()
            .enumerate()
            .map(|(position, expr)| ColumnLineage {
                position,
                name: expr.name(),
                sources: expr.columns(),
            })
            .collect()
    }
}

/// A fully resolved, validated task description.
///
/// Inputs and outputs are keyed by resource locator, in declaration order.
/// Once built, a task is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    resources: ReferenceTable,
    inputs: IndexMap<String, InputResource>,
    outputs: IndexMap<String, OutputResource>,
}

/// Where one output column comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLineage<'a> {
    /// Position of the column in its output schema
    pub position: usize,
    /// Effective name of the column, if it is aliased
    pub name: Option<&'a str>,
    /// Every input column read, depth-first
    pub sources: Vec<&'a ColumnRef>,
}

impl Task {
    /// Parse and normalize JSON text with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid JSON, or the first validation
    /// error found in the description.
    pub fn from_json(text: &str) -> Result<Self> {
        Normalizer::default().normalize_json(text)
    }

    /// Normalize an already parsed description with default limits.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found in the description.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Normalizer::default().normalize(&RawValue::from(value))
    }

    /// The reference table the task was declared with.
    #[must_use]
    pub const fn resources(&self) -> &ReferenceTable {
        &self.resources
    }

    /// Input resources keyed by locator.
    #[must_use]
    pub const fn inputs(&self) -> &IndexMap<String, InputResource> {
        &self.inputs
    }

    /// Output resources keyed by locator.
    #[must_use]
    pub const fn outputs(&self) -> &IndexMap<String, OutputResource> {
        &self.outputs
    }

    /// Look up an input by locator or by reference.
    #[must_use]
    pub fn input(&self, reference: &str) -> Option<&InputResource> {
        self.inputs.get(self.resources.resolve(reference))
    }

    /// Look up an output by locator or by reference.
    #[must_use]
    pub fn output(&self, reference: &str) -> Option<&OutputResource> {
        self.outputs.get(self.resources.resolve(reference))
    }

    /// Name of an input column, if the column is named.
    #[must_use]
    pub fn column_name(&self, column: &ColumnRef) -> Option<&str> {
        self.inputs
            .get(&column.resource)
            .and_then(|input| input.column_name(column.column))
    }

    /// For each column of an output, the input columns it is derived from.
    #[must_use]
    pub fn lineage(&self, reference: &str) -> Option<Vec<ColumnLineage<'_>>> {
        self.output(reference).map(OutputResource::lineage)
    }
}

/// One `inputs`/`outputs` entry with its specification checked.
struct Entry<'a> {
    reference: &'a str,
    path: DescriptorPath,
    spec: ResourceSpec<'a>,
}

/// Normalize a raw description into a [`Task`].
pub(crate) fn normalize(raw: &RawValue, limits: &Limits) -> Result<Task> {
    let root = DescriptorPath::root();
    check_root(raw, &root)?;

    let resources = ReferenceTable::from_raw(raw.get(RESOURCES_KEY), &root.key(RESOURCES_KEY))?;
    let input_entries = entries(raw.get(INPUTS_KEY), &root.key(INPUTS_KEY))?;
    let output_entries = entries(raw.get(OUTPUTS_KEY), &root.key(OUTPUTS_KEY))?;

    if input_entries.is_empty() && output_entries.is_empty() {
        return Err(Error::EmptyTask);
    }

    tracing::debug!(
        resources = resources.len(),
        inputs = input_entries.len(),
        outputs = output_entries.len(),
        "Normalizing task description"
    );

    let mut inputs: IndexMap<String, InputResource> = IndexMap::new();
    for entry in input_entries {
        let locator = resources.resolve(entry.reference);
        if resources.descriptor_key(locator).is_none() {
            return Err(Error::invalid_structure(
                &entry.path,
                format!("an input locator not starting with '{OPERATOR_SIGIL}', or a reference to it"),
                format!("'{locator}'"),
            ));
        }
        let input = InputResource::from_spec(&entry.spec, locator)?;
        match inputs.get(locator) {
            Some(existing) if *existing == input => {
                tracing::debug!(reference = entry.reference, locator, "Merged repeated input");
            }
            Some(_) => {
                return Err(Error::DuplicateInputResource {
                    path: entry.path,
                    locator: locator.to_string(),
                });
            }
            None => {
                tracing::debug!(
                    reference = entry.reference,
                    locator,
                    columns = input.schema().len(),
                    header = input.header(),
                    "Resolved input"
                );
                inputs.insert(locator.to_string(), input);
            }
        }
    }

    let resolver = Resolver::new(&resources, &inputs, limits);
    let mut outputs: IndexMap<String, OutputResource> = IndexMap::new();
    for entry in &output_entries {
        let locator = resources.resolve(entry.reference);
        if outputs.contains_key(locator) {
            return Err(Error::DuplicateOutputResource {
                path: entry.path.clone(),
                locator: locator.to_string(),
            });
        }

        let mut schema = Vec::with_capacity(entry.spec.schema.len());
        let mut names = HashSet::new();
        for (position, descriptor) in entry.spec.schema.iter().enumerate() {
            let column_path = entry.spec.schema_path.index(position);
            let expr = resolver.resolve(descriptor, locator, &column_path)?;
            if let Some(name) = expr.name() {
                if !names.insert(name.to_string()) {
                    return Err(Error::DuplicateOutputColumn {
                        path: column_path,
                        resource: locator.to_string(),
                        name: name.to_string(),
                    });
                }
            }
            schema.push(expr);
        }

        tracing::debug!(
            reference = entry.reference,
            locator,
            columns = schema.len(),
            header = entry.spec.header,
            "Resolved output"
        );
        outputs.insert(
            locator.to_string(),
            OutputResource {
                schema,
                header: entry.spec.header,
            },
        );
    }

    for (reference, locator) in resources.iter() {
        if !inputs.contains_key(locator) && !outputs.contains_key(locator) {
            tracing::debug!(reference, locator, "Resource is declared but never used");
        }
    }

    Ok(Task {
        resources,
        inputs,
        outputs,
    })
}

fn check_root(raw: &RawValue, path: &DescriptorPath) -> Result<()> {
    let entries = raw.as_mapping().ok_or_else(|| {
        Error::invalid_structure(path, "a task description mapping", raw.kind())
    })?;

    let mut seen = HashSet::new();
    for (key, _) in entries {
        let key_path = path.key(key);
        if !matches!(key.as_str(), RESOURCES_KEY | INPUTS_KEY | OUTPUTS_KEY) {
            return Err(Error::invalid_structure(
                &key_path,
                "only 'resources', 'inputs' and 'outputs' fields",
                format!("field '{key}'"),
            ));
        }
        if !seen.insert(key.as_str()) {
            return Err(Error::invalid_structure(
                &key_path,
                format!("a single '{key}' field"),
                "a repeated field",
            ));
        }
    }
    Ok(())
}

/// Read `inputs` or `outputs`: a mapping `{ref: spec}` or a sequence of
/// references without specifications.
fn entries<'a>(raw: Option<&'a RawValue>, path: &DescriptorPath) -> Result<Vec<Entry<'a>>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut check_unique = |reference: &'a str, entry_path: &DescriptorPath| {
        if seen.insert(reference) {
            Ok(())
        } else {
            Err(Error::DuplicateReference {
                path: entry_path.clone(),
                reference: reference.to_string(),
            })
        }
    };

    match raw {
        RawValue::Mapping(items) => items
            .iter()
            .map(|(reference, value)| {
                let entry_path = path.key(reference);
                check_unique(reference.as_str(), &entry_path)?;
                Ok(Entry {
                    reference: reference.as_str(),
                    spec: ResourceSpec::parse(value, &entry_path)?,
                    path: entry_path,
                })
            })
            .collect(),
        RawValue::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let reference = item.as_str().ok_or_else(|| {
                    Error::invalid_structure(&path.index(i), "a resource reference", item.kind())
                })?;
                let entry_path = path.key(reference);
                check_unique(reference, &path.index(i))?;
                Ok(Entry {
                    reference,
                    spec: ResourceSpec::empty(&entry_path),
                    path: entry_path,
                })
            })
            .collect(),
        other => Err(Error::invalid_structure(
            path,
            "a mapping of resource specifications or a sequence of resource references",
            other.kind(),
        )),
    }
}
