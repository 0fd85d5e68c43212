use crate::IndexError;
use serde::{Deserialize, Serialize};

/// Storage strategy for tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Flat node vector addressed by integer handles.
    #[default]
    Arena,
    /// Heap-allocated nodes owning their children.
    Linked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    #[default]
    Levenshtein,
    Indel,
}

/// Index construction settings, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub backend: BackendKind,
    pub metric: MetricKind,

    /// Number of nodes the arena reserves up front.
    pub initial_capacity: usize,

    /// When false the arena fails with `CapacityExceeded` instead of growing.
    pub allow_growth: bool,

    /// Tolerance used by callers that do not pass one explicitly.
    pub default_tolerance: usize,
}

impl IndexConfig {
    pub const DEFAULT_CAPACITY: usize = 1000;
    pub const DEFAULT_TOLERANCE: usize = 2;

    pub fn new() -> Self {
        Self {
            backend: BackendKind::default(),
            metric: MetricKind::default(),
            initial_capacity: Self::DEFAULT_CAPACITY,
            allow_growth: true,
            default_tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, IndexError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.backend == BackendKind::Arena && !self.allow_growth && self.initial_capacity == 0 {
            return Err(IndexError::InvalidConfig(
                "a fixed-size arena needs a non-zero initial_capacity".to_string(),
            ));
        }
        if self.initial_capacity > u32::MAX as usize {
            return Err(IndexError::InvalidConfig(format!(
                "initial_capacity {} exceeds the arena handle range",
                self.initial_capacity
            )));
        }
        Ok(())
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_metric(mut self, metric: MetricKind) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn fixed_capacity(mut self) -> Self {
        self.allow_growth = false;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.backend, BackendKind::Arena);
        assert_eq!(config.metric, MetricKind::Levenshtein);
        assert_eq!(config.initial_capacity, 1000);
        assert!(config.allow_growth);
        assert_eq!(config.default_tolerance, 2);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            IndexConfig::from_json(r#"{"backend": "linked", "default_tolerance": 1}"#).unwrap();
        assert_eq!(config.backend, BackendKind::Linked);
        assert_eq!(config.default_tolerance, 1);
        assert_eq!(config.initial_capacity, IndexConfig::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = IndexConfig::from_json(r#"{"backend": "btree"}"#).unwrap_err();
        assert!(matches!(err, IndexError::Config(_)));
    }

    #[test]
    fn test_validate_fixed_empty_arena() {
        let config = IndexConfig::new().with_capacity(0).fixed_capacity();
        assert!(matches!(
            config.validate(),
            Err(IndexError::InvalidConfig(_))
        ));
        // Linked nodes are allocated individually, capacity is irrelevant.
        assert!(config.with_backend(BackendKind::Linked).validate().is_ok());
    }
}
