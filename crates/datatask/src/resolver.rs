//! Column expression resolution.
//!
//! Turns one raw output schema entry into a canonical [`Expr`], checking every
//! column it reads against the declared input schemas. Resolution is
//! depth-first and stops at the first error.

use indexmap::IndexMap;

use crate::descriptor::{ColumnDescriptor, ResourceScope};
use crate::error::{Error, Result};
use crate::expr::{ColumnRef, Expr};
use crate::limits::Limits;
use crate::path::DescriptorPath;
use crate::reference::ReferenceTable;
use crate::schema::{ColumnSelector, InputResource};
use crate::value::RawValue;

/// Everything a descriptor may refer to: the reference table and the
/// already-normalized inputs, keyed by locator.
pub(crate) struct Resolver<'a> {
    references: &'a ReferenceTable,
    inputs: &'a IndexMap<String, InputResource>,
    limits: &'a Limits,
}

impl ResourceScope for Resolver<'_> {
    fn is_input(&self, reference: &str) -> bool {
        self.inputs.contains_key(self.references.resolve(reference))
    }

    fn is_declared(&self, reference: &str) -> bool {
        self.references.contains(reference)
    }
}

impl<'a> Resolver<'a> {
    pub fn new(
        references: &'a ReferenceTable,
        inputs: &'a IndexMap<String, InputResource>,
        limits: &'a Limits,
    ) -> Self {
        Self {
            references,
            inputs,
            limits,
        }
    }

    /// Resolve one descriptor whose home resource is `home` (a locator).
    pub fn resolve(&self, raw: &RawValue, home: &str, path: &DescriptorPath) -> Result<Expr> {
        self.resolve_at(raw, home, path, 1)
    }

    fn resolve_at(
        &self,
        raw: &RawValue,
        home: &str,
        path: &DescriptorPath,
        depth: usize,
    ) -> Result<Expr> {
        if !self.limits.allows_depth(depth) {
            return Err(Error::ExpressionTooDeep {
                path: path.clone(),
                limit: self.limits.max_depth,
            });
        }

        match ColumnDescriptor::parse(raw, self, path)? {
            ColumnDescriptor::ColumnName(name) => {
                self.lookup(home, &ColumnSelector::Name(name.to_string()), path)
            }
            ColumnDescriptor::ColumnIndex(index) => {
                self.lookup(home, &ColumnSelector::Index(index), path)
            }
            ColumnDescriptor::CrossResourceRef { resource, column } => {
                let locator = self.references.resolve(resource);
                self.lookup(locator, &column, &path.key(resource))
            }
            ColumnDescriptor::Alias { name, child } => {
                let child = self.resolve_at(child, home, &path.key(name), depth + 1)?;
                Ok(Expr::Alias {
                    name: name.to_string(),
                    child: Box::new(child),
                })
            }
            ColumnDescriptor::OperatorApp {
                key,
                operator,
                args,
            } => {
                let operator_path = path.key(key);
                let args = args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| self.resolve_at(arg, home, &operator_path.index(i), depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expr::Operator {
                    operator: operator.to_string(),
                    args,
                })
            }
        }
    }

    fn lookup(
        &self,
        locator: &str,
        selector: &ColumnSelector,
        path: &DescriptorPath,
    ) -> Result<Expr> {
        let position = self
            .inputs
            .get(locator)
            .and_then(|input| input.position(selector))
            .ok_or_else(|| Error::unknown_column(path, locator, selector))?;

        tracing::trace!(resource = locator, column = position, "Resolved column");
        Ok(Expr::Column(ColumnRef {
            resource: locator.to_string(),
            column: position,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ResourceSpec;

    struct Fixture {
        references: ReferenceTable,
        inputs: IndexMap<String, InputResource>,
        limits: Limits,
    }

    impl Fixture {
        fn new(max_depth: usize) -> Self {
            let resources = RawValue::from_json(r#"{"inv": "inventory.csv", "rep": "report.csv"}"#)
                .unwrap();
            let references =
                ReferenceTable::from_raw(Some(&resources), &DescriptorPath::root()).unwrap();

            let schema = RawValue::from_json(r#"["item", "quantity", "price"]"#).unwrap();
            let spec = ResourceSpec::parse(&schema, &DescriptorPath::root()).unwrap();
            let mut inputs = IndexMap::new();
            inputs.insert(
                "inventory.csv".to_string(),
                InputResource::from_spec(&spec, "inventory.csv").unwrap(),
            );

            Self {
                references,
                inputs,
                limits: Limits { max_depth },
            }
        }

        fn resolve(&self, json: &str, home: &str) -> Result<Expr> {
            let raw = RawValue::from_json(json).unwrap();
            Resolver::new(&self.references, &self.inputs, &self.limits).resolve(
                &raw,
                home,
                &DescriptorPath::root().key("outputs").key("rep").index(0),
            )
        }
    }

    fn column(column: usize) -> Expr {
        Expr::Column(ColumnRef {
            resource: "inventory.csv".to_string(),
            column,
        })
    }

    #[test]
    fn test_cross_resource_by_name_and_index() {
        let fixture = Fixture::new(8);
        assert_eq!(fixture.resolve(r#"{"inv": "price"}"#, "report.csv").unwrap(), column(2));
        assert_eq!(fixture.resolve(r#"{"inv": 0}"#, "report.csv").unwrap(), column(0));
        assert_eq!(
            fixture
                .resolve(r#"{"inventory.csv": "quantity"}"#, "report.csv")
                .unwrap(),
            column(1)
        );
    }

    #[test]
    fn test_home_columns() {
        let fixture = Fixture::new(8);
        assert_eq!(fixture.resolve(r#""item""#, "inventory.csv").unwrap(), column(0));
        let err = fixture.resolve(r#""item""#, "report.csv").unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { .. }));
    }

    #[test]
    fn test_operator_and_alias() {
        let fixture = Fixture::new(8);
        let expr = fixture
            .resolve(
                r#"{"cost": {"$mul": [{"inv": "quantity"}, {"inv": "price"}]}}"#,
                "report.csv",
            )
            .unwrap();
        assert_eq!(
            expr,
            Expr::Alias {
                name: "cost".to_string(),
                child: Box::new(Expr::Operator {
                    operator: "mul".to_string(),
                    args: vec![column(1), column(2)],
                }),
            }
        );
    }

    #[test]
    fn test_error_path_inside_operator() {
        let fixture = Fixture::new(8);
        let err = fixture
            .resolve(r#"{"$mul": [{"inv": "price"}, {"inv": "missing"}]}"#, "report.csv")
            .unwrap_err();
        assert_eq!(
            err.path().unwrap().to_string(),
            "outputs.rep[0].$mul[1].inv"
        );
        assert!(err.to_string().contains("'missing'"));
    }

    #[test]
    fn test_declared_output_is_not_an_input() {
        let fixture = Fixture::new(8);
        let err = fixture.resolve(r#"{"rep": 0}"#, "report.csv").unwrap_err();
        assert!(matches!(err, Error::UnknownResource { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let fixture = Fixture::new(3);
        assert!(fixture.resolve(r#"{"a": {"b": {"inv": 0}}}"#, "report.csv").is_ok());
        let err = fixture
            .resolve(r#"{"a": {"b": {"c": {"inv": 0}}}}"#, "report.csv")
            .unwrap_err();
        match err {
            Error::ExpressionTooDeep { path, limit } => {
                assert_eq!(limit, 3);
                assert_eq!(path.to_string(), "outputs.rep[0].a.b.c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
