//! Canonical column expressions.

use std::fmt;

/// A resolved column: the locator of an input resource and a position in
/// its schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Locator of the input resource
    pub resource: String,
    /// Zero-based position in the resource's schema
    pub column: usize,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource, self.column)
    }
}

/// How one output column is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A column read directly from an input resource
    Column(ColumnRef),
    /// A named wrapper around another expression
    Alias {
        /// Output column name
        name: String,
        /// The named expression
        child: Box<Expr>,
    },
    /// An opaque transformation over one or more argument expressions
    Operator {
        /// Operator name, without the `$` sigil
        operator: String,
        /// Arguments in order; never empty
        args: Vec<Expr>,
    },
}

impl Expr {
    /// The output column name: the outermost alias, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Alias { name, .. } => Some(name),
            Self::Column(_) | Self::Operator { .. } => None,
        }
    }

    /// Every column read by this expression, depth-first and left to right.
    #[must_use]
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Self::Column(column) => out.push(column),
            Self::Alias { child, .. } => child.collect_columns(out),
            Self::Operator { args, .. } => {
                for arg in args {
                    arg.collect_columns(out);
                }
            }
        }
    }

    /// Nesting depth; a bare column has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Column(_) => 1,
            Self::Alias { child, .. } => 1 + child.depth(),
            Self::Operator { args, .. } => 1 + args.iter().map(Self::depth).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => column.fmt(f),
            Self::Alias { name, child } => write!(f, "{name} = {child}"),
            Self::Operator { operator, args } => {
                write!(f, "${operator}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    arg.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(resource: &str, column: usize) -> Expr {
        Expr::Column(ColumnRef {
            resource: resource.to_string(),
            column,
        })
    }

    fn cost() -> Expr {
        Expr::Alias {
            name: "cost".to_string(),
            child: Box::new(Expr::Operator {
                operator: "mul".to_string(),
                args: vec![column("inv.csv", 1), column("inv.csv", 2)],
            }),
        }
    }

    #[test]
    fn test_name_is_outermost_alias() {
        let renamed = Expr::Alias {
            name: "total".to_string(),
            child: Box::new(cost()),
        };
        assert_eq!(renamed.name(), Some("total"));
        assert_eq!(column("a", 0).name(), None);
    }

    #[test]
    fn test_columns_in_order() {
        let expr = cost();
        let columns: Vec<_> = expr.columns().iter().map(|c| c.column).collect();
        assert_eq!(columns, [1, 2]);
    }

    #[test]
    fn test_depth() {
        assert_eq!(column("a", 0).depth(), 1);
        assert_eq!(cost().depth(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(cost().to_string(), "cost = $mul(inv.csv[1], inv.csv[2])");
    }
}
