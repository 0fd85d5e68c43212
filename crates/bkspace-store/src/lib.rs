//! Node storage backends for the BK-tree.
//!
//! A backend owns the nodes and answers one question for the search code:
//! "which child hangs off this node at distance `d`?". [`ArenaStore`] keeps
//! nodes in a flat vector and links them with `u32` handles, [`LinkedStore`]
//! lets every node own its children directly. Both place tokens with the same
//! routing algorithm, so for a given insertion sequence they build trees of
//! identical shape.

mod arena_impl;
mod linked_impl;

pub use arena_impl::{ArenaNode, ArenaStore, NodeId};
pub use linked_impl::{LinkedNode, LinkedStore};

use bkspace_core::{Distance, IndexError, Metric, Payload};

/// Result of a successful insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The token created a new node.
    Inserted,
    /// The token was already present; only its payload changed.
    Duplicate,
}

/// Read access to a stored node.
pub trait StoredNode {
    fn token(&self) -> &str;
    fn payload(&self) -> &Payload;
}

pub trait NodeStore: Clone + Send + Sync + 'static {
    type Node: StoredNode + Send + Sync;

    /// Short name used in logs and benchmark labels.
    const NAME: &'static str;

    fn root(&self) -> Option<&Self::Node>;

    /// The child of `parent` at exactly `distance`, if any.
    fn child<'a>(&'a self, parent: &'a Self::Node, distance: Distance) -> Option<&'a Self::Node>;

    /// Upper bound on the distance keys of `parent`'s children. Range scans
    /// clamp to it; `None` means the node is a leaf.
    fn max_child_distance(&self, parent: &Self::Node) -> Option<Distance>;

    /// All children of `parent` with their distance keys, in no particular order.
    fn children<'a>(
        &'a self,
        parent: &'a Self::Node,
    ) -> impl Iterator<Item = (Distance, &'a Self::Node)> + 'a;

    /// Routes `token` from the root with metric `M` and either records the
    /// occurrence on an equal node or attaches a new leaf.
    ///
    /// On error the store is left unchanged.
    fn insert<M: Metric>(
        &mut self,
        token: &str,
        entity: Option<&str>,
    ) -> Result<InsertOutcome, IndexError>;

    /// Number of nodes (distinct tokens).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate heap footprint of the whole tree in bytes.
    fn heap_bytes(&self) -> usize;
}
