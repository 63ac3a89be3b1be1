//! Accessor configuration.

/// What value extraction does with requested names that are not tagged on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Leave them out of the output.
    #[default]
    Skip,
    /// Fail with `FieldNotFound`, like reference extraction does.
    Error,
}

/// Accessor configuration
#[derive(Debug, Clone)]
pub struct AccessorConfig {
    /// Tag value that hides a field from every operation
    pub sentinel: &'static str,
    /// Handling of unknown names during value extraction
    pub missing_field_policy: MissingFieldPolicy,
    /// Whether filtering propagates a failure to build the reference map instead of returning empty results
    pub strict_filter: bool,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            sentinel: "-",
            missing_field_policy: MissingFieldPolicy::Skip,
            strict_filter: false,
        }
    }
}

impl AccessorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusion sentinel
    pub fn with_sentinel(mut self, sentinel: &'static str) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Set the missing-field policy for value extraction
    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    /// Propagate reference-map failures out of filtering
    pub fn with_strict_filter(mut self, strict: bool) -> Self {
        self.strict_filter = strict;
        self
    }
}
