#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod dynamic;
mod linear;
mod shared;

pub use dynamic::{build_index, TokenIndex};
pub use linear::LinearScan;
pub use shared::SharedIndex;

pub use bkspace_core::{
    BackendKind, Distance, IndexConfig, IndexError, Indel, Levenshtein, Metric, MetricKind,
    Payload,
};
pub use bkspace_store::{ArenaStore, InsertOutcome, LinkedStore, NodeStore, StoredNode};

use bkspace_core::rank_entities;
use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};
use std::marker::PhantomData;
use tracing::trace;

pub type ArenaBkTree<M = Levenshtein> = BkTree<ArenaStore, M>;
pub type LinkedBkTree<M = Levenshtein> = BkTree<LinkedStore, M>;

/// A token matched by a range query.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub token: &'a str,
    /// Metric distance from the query.
    pub distance: Distance,
    pub payload: &'a Payload,
}

/// Shape and footprint of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    /// Nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub height: usize,
    pub heap_bytes: usize,
}

/// Burkhard-Keller tree over tokens, generic over node storage and metric.
///
/// Children are keyed by their exact distance to the parent. A range query for
/// `(q, tol)` that computes `d = M::distance(node, q)` only needs to descend
/// into children keyed `d - tol ..= d + tol`; by the triangle inequality no
/// other subtree can hold a match.
pub struct BkTree<S: NodeStore = ArenaStore, M: Metric = Levenshtein> {
    store: S,
    _marker: PhantomData<M>,
}

impl<S: NodeStore, M: Metric> BkTree<S, M> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds one occurrence of `token`, attributed to `entity` if given.
    ///
    /// Re-inserting an existing token only bumps its payload.
    pub fn insert(
        &mut self,
        token: &str,
        entity: Option<&str>,
    ) -> Result<InsertOutcome, IndexError> {
        self.store.insert::<M>(token, entity)
    }

    /// Inserts `(token, entity)` pairs in order and returns how many new nodes
    /// were created. Stops at the first error; earlier pairs stay inserted.
    pub fn insert_all<I, T, E>(&mut self, pairs: I) -> Result<usize, IndexError>
    where
        I: IntoIterator<Item = (T, Option<E>)>,
        T: AsRef<str>,
        E: AsRef<str>,
    {
        let mut created = 0;
        for (token, entity) in pairs {
            let entity = entity.as_ref().map(|e| e.as_ref());
            if self.insert(token.as_ref(), entity)? == InsertOutcome::Inserted {
                created += 1;
            }
        }
        Ok(created)
    }

    /// All stored tokens within `tolerance` of `query`, in traversal order.
    pub fn search(&self, query: &str, tolerance: Distance) -> Vec<Match<'_>> {
        let mut matches = Vec::new();
        let Some(root) = self.store.root() else {
            return matches;
        };

        let mut stack: SmallVec<[&S::Node; 32]> = smallvec![root];
        let mut visited = 0usize;
        while let Some(node) = stack.pop() {
            visited += 1;
            let d = M::distance(node.token(), query);
            if d <= tolerance {
                matches.push(Match {
                    token: node.token(),
                    distance: d,
                    payload: node.payload(),
                });
            }

            let Some(max_key) = self.store.max_child_distance(node) else {
                continue;
            };
            let low = d.saturating_sub(tolerance);
            let high = d.saturating_add(tolerance).min(max_key);
            for key in low..=high {
                if let Some(child) = self.store.child(node, key) {
                    stack.push(child);
                }
            }
        }

        trace!(
            backend = S::NAME,
            query,
            tolerance,
            visited,
            matched = matches.len(),
            "range query"
        );
        matches
    }

    pub fn similar_tokens(&self, query: &str, tolerance: Distance) -> Vec<String> {
        self.search(query, tolerance)
            .into_iter()
            .map(|m| m.token.to_owned())
            .collect()
    }

    /// Entities behind all tokens within `tolerance`, by total occurrences, descending.
    pub fn ranked_entities(&self, query: &str, tolerance: Distance) -> Vec<(String, u64)> {
        rank_entities(self.search(query, tolerance).into_iter().map(|m| m.payload))
    }

    pub fn similar_tokens_batch<Q>(&self, queries: &[Q], tolerance: Distance) -> Vec<Vec<String>>
    where
        Q: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|q| self.similar_tokens(q.as_ref(), tolerance))
            .collect()
    }

    pub fn ranked_entities_batch<Q>(
        &self,
        queries: &[Q],
        tolerance: Distance,
    ) -> Vec<Vec<(String, u64)>>
    where
        Q: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|q| self.ranked_entities(q.as_ref(), tolerance))
            .collect()
    }

    /// Payload of the node holding exactly `token`.
    pub fn payload_of(&self, token: &str) -> Option<&Payload> {
        let mut node = self.store.root()?;
        loop {
            let d = M::distance(token, node.token());
            if d == 0 {
                return Some(node.payload());
            }
            node = self.store.child(node, d)?;
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.payload_of(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        let mut height = 0;
        if let Some(root) = self.store.root() {
            let mut stack = vec![(root, 1usize)];
            while let Some((node, depth)) = stack.pop() {
                height = height.max(depth);
                stack.extend(self.store.children(node).map(|(_, c)| (c, depth + 1)));
            }
        }
        TreeStats {
            nodes: self.store.len(),
            height,
            heap_bytes: self.store.heap_bytes(),
        }
    }
}

impl<M: Metric> BkTree<ArenaStore, M> {
    pub fn arena() -> Self {
        Self::with_store(ArenaStore::new())
    }

    pub fn arena_from_config(config: &IndexConfig) -> Self {
        Self::with_store(ArenaStore::from_config(config))
    }
}

impl<M: Metric> BkTree<LinkedStore, M> {
    pub fn linked() -> Self {
        Self::with_store(LinkedStore::new())
    }
}

impl<S: NodeStore + Default, M: Metric> Default for BkTree<S, M> {
    fn default() -> Self {
        Self::with_store(S::default())
    }
}

impl<S: NodeStore, M: Metric> Clone for BkTree<S, M> {
    fn clone(&self) -> Self {
        Self::with_store(self.store.clone())
    }
}

impl<S: NodeStore + std::fmt::Debug, M: Metric> std::fmt::Debug for BkTree<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BkTree").field("store", &self.store).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn test_empty_tree() {
        let tree = ArenaBkTree::<Levenshtein>::arena();
        assert!(tree.is_empty());
        assert!(tree.search("anything", 5).is_empty());
        assert!(tree.ranked_entities("", 3).is_empty());
        assert_eq!(tree.stats().height, 0);
    }

    #[test]
    fn test_dedup_counts() {
        let mut tree = LinkedBkTree::<Levenshtein>::linked();
        for _ in 0..3 {
            tree.insert("delay", Some("A")).unwrap();
        }
        let hits = tree.search("delay", 0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].token, "delay");
        assert_eq!(hits[0].distance, 0);
        assert_eq!(hits[0].payload.count("A"), 3);
    }

    #[test]
    fn test_exact_lookup() {
        let mut tree = ArenaBkTree::<Levenshtein>::arena();
        tree.insert_all([("cat", Some("x")), ("cart", None), ("care", Some("y"))])
            .unwrap();
        assert!(tree.contains("cart"));
        assert!(!tree.contains("car"));
        assert_eq!(tree.payload_of("care").unwrap().count("y"), 1);
        assert_eq!(tree.similar_tokens("cat", 0), vec!["cat".to_string()]);
    }

    #[test]
    fn test_empty_query_matches_short_tokens() {
        let mut tree = ArenaBkTree::<Levenshtein>::arena();
        tree.insert_all([("a", None::<&str>), ("ab", None), ("abcd", None)])
            .unwrap();
        assert_eq!(
            sorted(tree.similar_tokens("", 2)),
            vec!["a".to_string(), "ab".to_string()]
        );
    }

    #[test]
    fn test_insert_all_counts_new_nodes() {
        let mut tree = LinkedBkTree::<Levenshtein>::linked();
        let created = tree
            .insert_all([("one", Some("a")), ("two", Some("a")), ("one", Some("b"))])
            .unwrap();
        assert_eq!(created, 2);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_stats_height() {
        let mut tree = ArenaBkTree::<Levenshtein>::arena();
        tree.insert_all([("a", None::<&str>), ("ab", None), ("abc", None)])
            .unwrap();
        let stats = tree.stats();
        assert_eq!(stats.nodes, 3);
        // "ab" hangs at d=1 under "a", "abc" at d=2 under "a".
        assert_eq!(stats.height, 2);
        assert!(stats.heap_bytes > 0);
    }

    #[test]
    fn test_huge_tolerance_does_not_overflow() {
        let mut tree = LinkedBkTree::<Levenshtein>::linked();
        tree.insert_all([("alpha", None::<&str>), ("beta", None), ("gamma", None)])
            .unwrap();
        assert_eq!(tree.search("x", usize::MAX).len(), 3);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let mut tree = ArenaBkTree::<Levenshtein>::arena();
        tree.insert_all([
            ("delay", Some("X")),
            ("delayed", Some("X")),
            ("delight", Some("Y")),
            ("service", Some("Z")),
        ])
        .unwrap();
        let queries = ["delay", "servce", "dlight", "zzz"];
        let batch = tree.ranked_entities_batch(&queries, 2);
        for (q, ranked) in queries.iter().zip(&batch) {
            assert_eq!(ranked, &tree.ranked_entities(q, 2));
        }
        let tokens = tree.similar_tokens_batch(&queries, 1);
        assert_eq!(tokens.len(), queries.len());
        assert_eq!(tokens[1], vec!["service".to_string()]);
    }
}
