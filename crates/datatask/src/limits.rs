//! Normalization limits

/// Default maximum nesting depth of a column expression
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration limits for task normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of a column expression.
    ///
    /// A top-level descriptor has depth 1 and every alias or operator level
    /// adds one.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    /// Whether an expression at `depth` is still allowed
    #[must_use]
    pub const fn allows_depth(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }
}
