use crate::Match;
use bkspace_core::{rank_entities, Distance, Levenshtein, Metric, Payload};
use bkspace_store::InsertOutcome;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Brute-force baseline: keeps unique tokens in a hash map and compares the
/// query against every one of them.
///
/// Same answers as a `BkTree` with the same metric, at O(n) metric calls per
/// query. Used as the reference in tests and benchmarks.
pub struct LinearScan<M: Metric = Levenshtein> {
    entries: HashMap<String, Payload>,
    _marker: PhantomData<M>,
}

impl<M: Metric> LinearScan<M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            _marker: PhantomData,
        }
    }

    pub fn insert(&mut self, token: &str, entity: Option<&str>) -> InsertOutcome {
        if let Some(payload) = self.entries.get_mut(token) {
            payload.record(entity);
            InsertOutcome::Duplicate
        } else {
            self.entries
                .insert(token.to_owned(), Payload::with_entity(entity));
            InsertOutcome::Inserted
        }
    }

    pub fn search(&self, query: &str, tolerance: Distance) -> Vec<Match<'_>> {
        self.entries
            .iter()
            .filter_map(|(token, payload)| {
                let distance = M::distance(token, query);
                (distance <= tolerance).then_some(Match {
                    token,
                    distance,
                    payload,
                })
            })
            .collect()
    }

    pub fn similar_tokens(&self, query: &str, tolerance: Distance) -> Vec<String> {
        self.search(query, tolerance)
            .into_iter()
            .map(|m| m.token.to_owned())
            .collect()
    }

    pub fn ranked_entities(&self, query: &str, tolerance: Distance) -> Vec<(String, u64)> {
        rank_entities(self.search(query, tolerance).into_iter().map(|m| m.payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn heap_bytes(&self) -> usize {
        let entry = std::mem::size_of::<(String, Payload)>() + 1;
        self.entries.capacity() * entry
            + self
                .entries
                .iter()
                .map(|(t, p)| t.capacity() + p.heap_bytes())
                .sum::<usize>()
    }
}

impl<M: Metric> Default for LinearScan<M> {
    fn default() -> Self {
        Self::new()
    }
}
