use crate::{InsertOutcome, NodeStore, StoredNode};
use bkspace_core::{Distance, IndexError, Metric, Payload};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct LinkedNode {
    token: Box<str>,
    children: HashMap<Distance, Box<LinkedNode>>,
    /// Largest key in `children`, 0 for a leaf.
    max_key: Distance,
    payload: Payload,
}

impl LinkedNode {
    fn new(token: &str, entity: Option<&str>) -> Self {
        Self {
            token: token.into(),
            children: HashMap::new(),
            max_key: 0,
            payload: Payload::with_entity(entity),
        }
    }

    fn heap_bytes(&self) -> usize {
        let entry = std::mem::size_of::<(Distance, Box<LinkedNode>)>() + 1;
        self.token.len()
            + self.children.capacity() * entry
            + self.payload.heap_bytes()
            + self
                .children
                .values()
                .map(|c| std::mem::size_of::<LinkedNode>() + c.heap_bytes())
                .sum::<usize>()
    }
}

impl StoredNode for LinkedNode {
    fn token(&self) -> &str {
        &self.token
    }

    fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Every node is its own heap allocation and owns a sparse distance -> child map.
#[derive(Debug, Clone, Default)]
pub struct LinkedStore {
    root: Option<Box<LinkedNode>>,
    len: usize,
}

impl LinkedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeStore for LinkedStore {
    type Node = LinkedNode;

    const NAME: &'static str = "linked";

    fn root(&self) -> Option<&LinkedNode> {
        self.root.as_deref()
    }

    fn child<'a>(&'a self, parent: &'a LinkedNode, distance: Distance) -> Option<&'a LinkedNode> {
        parent.children.get(&distance).map(Box::as_ref)
    }

    fn max_child_distance(&self, parent: &LinkedNode) -> Option<Distance> {
        (!parent.children.is_empty()).then_some(parent.max_key)
    }

    fn children<'a>(
        &'a self,
        parent: &'a LinkedNode,
    ) -> impl Iterator<Item = (Distance, &'a LinkedNode)> + 'a {
        parent.children.iter().map(|(&d, c)| (d, c.as_ref()))
    }

    fn insert<M: Metric>(
        &mut self,
        token: &str,
        entity: Option<&str>,
    ) -> Result<InsertOutcome, IndexError> {
        let Some(mut node) = self.root.as_deref_mut() else {
            self.root = Some(Box::new(LinkedNode::new(token, entity)));
            self.len = 1;
            trace!(token, "linked root");
            return Ok(InsertOutcome::Inserted);
        };

        loop {
            let d = M::distance(token, &node.token);
            if d == 0 {
                node.payload.record(entity);
                return Ok(InsertOutcome::Duplicate);
            }

            match node.children.entry(d) {
                Entry::Occupied(slot) => node = &mut **slot.into_mut(),
                Entry::Vacant(slot) => {
                    slot.insert(Box::new(LinkedNode::new(token, entity)));
                    node.max_key = node.max_key.max(d);
                    self.len += 1;
                    trace!(token, distance = d, "linked insert");
                    return Ok(InsertOutcome::Inserted);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn heap_bytes(&self) -> usize {
        self.root
            .as_deref()
            .map_or(0, |r| std::mem::size_of::<LinkedNode>() + r.heap_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkspace_core::Levenshtein;

    #[test]
    fn test_linked_insert_and_children() {
        let mut store = LinkedStore::new();
        assert!(store.is_empty());

        store.insert::<Levenshtein>("book", Some("a")).unwrap();
        store.insert::<Levenshtein>("books", Some("b")).unwrap();
        store.insert::<Levenshtein>("cake", None).unwrap();
        store.insert::<Levenshtein>("boo", None).unwrap(); // d = 1, routes under "books"

        assert_eq!(store.len(), 4);
        let root = store.root().unwrap();
        assert_eq!(store.max_child_distance(root), Some(4));

        let books = store.child(root, 1).unwrap();
        assert_eq!(books.token(), "books");
        let boo = store.child(books, 2).unwrap();
        assert_eq!(boo.token(), "boo");
        assert_eq!(store.max_child_distance(boo), None);

        let mut keys: Vec<_> = store.children(root).map(|(d, _)| d).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 4]);
    }

    #[test]
    fn test_linked_duplicate() {
        let mut store = LinkedStore::new();
        for _ in 0..3 {
            store.insert::<Levenshtein>("delay", Some("A")).unwrap();
        }
        let outcome = store.insert::<Levenshtein>("delay", None).unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);
        assert_eq!(store.len(), 1);

        let root = store.root().unwrap();
        assert_eq!(root.payload().count("A"), 3);
        assert_eq!(root.payload().unattributed(), 1);
    }

    #[test]
    fn test_linked_heap_bytes_grows() {
        let mut store = LinkedStore::new();
        assert_eq!(store.heap_bytes(), 0);
        store.insert::<Levenshtein>("alpha", None).unwrap();
        let one = store.heap_bytes();
        store.insert::<Levenshtein>("beta", None).unwrap();
        assert!(store.heap_bytes() > one);
    }
}
