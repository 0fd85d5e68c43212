use crate::{BkTree, LinearScan};
use bkspace_core::{
    BackendKind, Distance, IndexConfig, IndexError, Indel, Levenshtein, Metric, MetricKind,
};
use bkspace_store::{ArenaStore, InsertOutcome, LinkedStore, NodeStore};
use tracing::debug;

/// Backend-agnostic index interface, object safe so callers can pick the
/// storage and metric at runtime.
pub trait TokenIndex: Send + Sync {
    /// Storage strategy name, e.g. `"arena"`.
    fn backend(&self) -> &'static str;

    fn insert(&mut self, token: &str, entity: Option<&str>) -> Result<InsertOutcome, IndexError>;

    fn similar_tokens(&self, query: &str, tolerance: Distance) -> Vec<String>;

    fn ranked_entities(&self, query: &str, tolerance: Distance) -> Vec<(String, u64)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn heap_bytes(&self) -> usize;
}

impl<S: NodeStore, M: Metric> TokenIndex for BkTree<S, M> {
    fn backend(&self) -> &'static str {
        S::NAME
    }

    fn insert(&mut self, token: &str, entity: Option<&str>) -> Result<InsertOutcome, IndexError> {
        BkTree::insert(self, token, entity)
    }

    fn similar_tokens(&self, query: &str, tolerance: Distance) -> Vec<String> {
        BkTree::similar_tokens(self, query, tolerance)
    }

    fn ranked_entities(&self, query: &str, tolerance: Distance) -> Vec<(String, u64)> {
        BkTree::ranked_entities(self, query, tolerance)
    }

    fn len(&self) -> usize {
        BkTree::len(self)
    }

    fn heap_bytes(&self) -> usize {
        self.store().heap_bytes()
    }
}

impl<M: Metric> TokenIndex for LinearScan<M> {
    fn backend(&self) -> &'static str {
        "linear"
    }

    fn insert(&mut self, token: &str, entity: Option<&str>) -> Result<InsertOutcome, IndexError> {
        Ok(LinearScan::insert(self, token, entity))
    }

    fn similar_tokens(&self, query: &str, tolerance: Distance) -> Vec<String> {
        LinearScan::similar_tokens(self, query, tolerance)
    }

    fn ranked_entities(&self, query: &str, tolerance: Distance) -> Vec<(String, u64)> {
        LinearScan::ranked_entities(self, query, tolerance)
    }

    fn len(&self) -> usize {
        LinearScan::len(self)
    }

    fn heap_bytes(&self) -> usize {
        LinearScan::heap_bytes(self)
    }
}

/// Builds an empty index for the configured backend and metric.
pub fn build_index(config: &IndexConfig) -> Result<Box<dyn TokenIndex>, IndexError> {
    config.validate()?;
    debug!(backend = ?config.backend, metric = ?config.metric, "building index");

    let index: Box<dyn TokenIndex> = match (config.backend, config.metric) {
        (BackendKind::Arena, MetricKind::Levenshtein) => {
            Box::new(BkTree::<ArenaStore, Levenshtein>::arena_from_config(config))
        }
        (BackendKind::Arena, MetricKind::Indel) => {
            Box::new(BkTree::<ArenaStore, Indel>::arena_from_config(config))
        }
        (BackendKind::Linked, MetricKind::Levenshtein) => {
            Box::new(BkTree::<LinkedStore, Levenshtein>::linked())
        }
        (BackendKind::Linked, MetricKind::Indel) => {
            Box::new(BkTree::<LinkedStore, Indel>::linked())
        }
    };
    Ok(index)
}
