use crate::BkTree;
use arc_swap::ArcSwap;
use bkspace_core::{Distance, IndexError, Metric};
use bkspace_store::NodeStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// A tree shared between many readers and one writer at a time.
///
/// Readers take an immutable snapshot with [`SharedIndex::load`] and never
/// block. Writers build a new tree and publish it in a single atomic swap;
/// readers holding an older snapshot keep seeing it until they drop it.
pub struct SharedIndex<S: NodeStore, M: Metric> {
    current: ArcSwap<BkTree<S, M>>,
    writer: Mutex<()>,
}

impl<S: NodeStore, M: Metric> SharedIndex<S, M> {
    pub fn new(tree: BkTree<S, M>) -> Self {
        Self {
            current: ArcSwap::from_pointee(tree),
            writer: Mutex::new(()),
        }
    }

    /// The currently published tree.
    pub fn load(&self) -> Arc<BkTree<S, M>> {
        self.current.load_full()
    }

    /// Replaces the published tree and returns the previous one.
    pub fn publish(&self, tree: BkTree<S, M>) -> Arc<BkTree<S, M>> {
        let _guard = self.writer.lock();
        self.swap(tree)
    }

    /// Copies the current tree, inserts `pairs` into the copy and publishes it.
    ///
    /// If any insertion fails nothing is published and readers keep the old tree.
    pub fn apply_batch<I, T, E>(&self, pairs: I) -> Result<usize, IndexError>
    where
        I: IntoIterator<Item = (T, Option<E>)>,
        T: AsRef<str>,
        E: AsRef<str>,
    {
        let _guard = self.writer.lock();
        let mut next = BkTree::clone(&self.current.load());
        let created = next.insert_all(pairs)?;
        self.swap(next);
        Ok(created)
    }

    pub fn similar_tokens(&self, query: &str, tolerance: Distance) -> Vec<String> {
        self.current.load().similar_tokens(query, tolerance)
    }

    pub fn ranked_entities(&self, query: &str, tolerance: Distance) -> Vec<(String, u64)> {
        self.current.load().ranked_entities(query, tolerance)
    }

    fn swap(&self, tree: BkTree<S, M>) -> Arc<BkTree<S, M>> {
        let nodes = tree.len();
        let previous = self.current.swap(Arc::new(tree));
        debug!(
            backend = S::NAME,
            nodes,
            previous = previous.len(),
            "published index snapshot"
        );
        previous
    }
}

impl<S: NodeStore + Default, M: Metric> Default for SharedIndex<S, M> {
    fn default() -> Self {
        Self::new(BkTree::default())
    }
}
