//! Builder pattern for configuring normalization

use crate::error::Result;
use crate::limits::Limits;
use crate::task::Task;
use crate::value::RawValue;

/// Configuration builder for [`Normalizer`]
#[derive(Debug, Default)]
pub struct NormalizerBuilder {
    limits: Limits,
}

impl NormalizerBuilder {
    /// Creates a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum column expression depth
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.limits.max_depth = depth;
        self
    }

    /// Replace all limits at once
    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the normalizer
    #[must_use]
    pub fn build(self) -> Normalizer {
        Normalizer {
            limits: self.limits,
        }
    }
}

/// Turns raw task descriptions into canonical [`Task`]s.
///
/// A normalizer holds only its limits, so one instance can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    limits: Limits,
}

impl Normalizer {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::new()
    }

    /// The limits this normalizer enforces
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Normalize a raw description
    ///
    /// # Errors
    ///
    /// Returns the first validation error found in the description
    pub fn normalize(&self, raw: &RawValue) -> Result<Task> {
        crate::task::normalize(raw, &self.limits)
    }

    /// Parse and normalize JSON text
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] for invalid JSON, or the first
    /// validation error found in the description
    pub fn normalize_json(&self, text: &str) -> Result<Task> {
        let raw = RawValue::from_json(text)?;
        self.normalize(&raw)
    }
}
