pub mod config;
pub mod error;
pub mod payload;

pub use config::{BackendKind, IndexConfig, MetricKind};
pub use error::IndexError;
pub use payload::{rank_entities, Payload};

/// Edit distance between two tokens.
pub type Distance = usize;

/// Metric abstraction for token distance.
///
/// Implementations must be symmetric, return zero only for equal tokens and
/// satisfy the triangle inequality. Range queries prune subtrees based on that
/// last property, so a metric that violates it silently loses matches.
pub trait Metric: Send + Sync + 'static {
    fn distance(a: &str, b: &str) -> Distance;
}

/// Classic Levenshtein distance: insertion, deletion and substitution each cost 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl Metric for Levenshtein {
    fn distance(a: &str, b: &str) -> Distance {
        if a == b {
            return 0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() {
            return b.len();
        }
        if b.is_empty() {
            return a.len();
        }

        // Two rows of the (|a|+1) x (|b|+1) table; `prev[j]` is table[i-1][j].
        let mut prev: Vec<Distance> = (0..=b.len()).collect();
        let mut curr = vec![0; b.len() + 1];

        for (i, ca) in a.iter().enumerate() {
            curr[0] = i + 1;
            for (j, cb) in b.iter().enumerate() {
                curr[j + 1] = if ca == cb {
                    prev[j]
                } else {
                    1 + prev[j].min(prev[j + 1]).min(curr[j])
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        prev[b.len()]
    }
}

/// Insertion/deletion-only edit distance, `|a| + |b| - 2 * lcs(a, b)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Indel;

impl Metric for Indel {
    fn distance(a: &str, b: &str) -> Distance {
        if a == b {
            return 0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut prev = vec![0usize; b.len() + 1];
        let mut curr = vec![0usize; b.len() + 1];
        for ca in &a {
            for (j, cb) in b.iter().enumerate() {
                curr[j + 1] = if ca == cb {
                    prev[j] + 1
                } else {
                    prev[j + 1].max(curr[j])
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        let lcs = prev[b.len()];

        a.len() + b.len() - 2 * lcs
    }
}

#[cfg(test)]
mod tests;
