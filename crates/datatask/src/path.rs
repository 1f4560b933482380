//! Locations inside a raw task description.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Path from the description root to a fragment, such as
/// `outputs.report.csv.schema[1].$mul[0]`.
///
/// Paths are built by extension: every step returns a new path, leaving the
/// parent untouched, so a resolver can hand the same parent to each child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorPath {
    segments: Vec<Segment>,
}

impl DescriptorPath {
    /// The description root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with a mapping key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// Extend the path with a sequence position.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Whether this is the description root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DescriptorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if position == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
