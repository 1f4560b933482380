//! Resource specifications, the values attached to `inputs`/`outputs` entries.

use crate::error::{Error, Result};
use crate::path::DescriptorPath;
use crate::value::RawValue;

const SCHEMA_KEY: &str = "schema";
const HEADER_KEY: &str = "header";

/// A resource specification with its container shape checked.
///
/// The schema entries are still raw: inputs read them as column
/// declarations, outputs as column derivations.
#[derive(Debug, Clone)]
pub(crate) struct ResourceSpec<'a> {
    pub schema: &'a [RawValue],
    pub schema_path: DescriptorPath,
    pub header: bool,
}

impl<'a> ResourceSpec<'a> {
    /// The specification of a resource listed without one.
    pub fn empty(path: &DescriptorPath) -> Self {
        Self {
            schema: &[],
            schema_path: path.key(SCHEMA_KEY),
            header: false,
        }
    }

    /// Read either the short form (`[...]`, the schema itself) or the long
    /// form (`{"schema": [...], "header": bool}`, both optional).
    pub fn parse(raw: &'a RawValue, path: &DescriptorPath) -> Result<Self> {
        match raw {
            RawValue::Sequence(schema) => Ok(Self {
                schema,
                schema_path: path.clone(),
                header: false,
            }),
            RawValue::Mapping(entries) => {
                let mut spec = Self::empty(path);
                let mut seen_schema = false;
                let mut seen_header = false;

                for (key, value) in entries {
                    let field_path = path.key(key);
                    match key.as_str() {
                        SCHEMA_KEY if !seen_schema => {
                            seen_schema = true;
                            spec.schema = value.as_sequence().ok_or_else(|| {
                                Error::invalid_structure(
                                    &field_path,
                                    "a schema sequence",
                                    value.kind(),
                                )
                            })?;
                            spec.schema_path = field_path;
                        }
                        HEADER_KEY if !seen_header => {
                            seen_header = true;
                            spec.header = value.as_bool().ok_or_else(|| {
                                Error::invalid_structure(
                                    &field_path,
                                    "a boolean header indicator",
                                    value.kind(),
                                )
                            })?;
                        }
                        SCHEMA_KEY | HEADER_KEY => {
                            return Err(Error::invalid_structure(
                                &field_path,
                                format!("a single '{key}' field"),
                                "a repeated field",
                            ));
                        }
                        other => {
                            return Err(Error::invalid_structure(
                                &field_path,
                                "a specification with only 'schema' and/or 'header' fields",
                                format!("field '{other}'"),
                            ));
                        }
                    }
                }
                Ok(spec)
            }
            other => Err(Error::invalid_structure(
                path,
                "a schema sequence or a specification mapping",
                other.kind(),
            )),
        }
    }
}
