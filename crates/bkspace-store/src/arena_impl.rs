use crate::{InsertOutcome, NodeStore, StoredNode};
use bkspace_core::{Distance, IndexConfig, IndexError, Metric, Payload};
use tracing::{debug, trace, warn};

/// Handle of a node inside the arena.
pub type NodeId = u32;

/// Marks an empty distance slot.
const NO_CHILD: NodeId = NodeId::MAX;

#[derive(Debug, Clone)]
pub struct ArenaNode {
    token: Box<str>,
    /// `slots[d]` is the child at distance `d`, or `NO_CHILD`.
    slots: Vec<NodeId>,
    payload: Payload,
}

impl ArenaNode {
    fn new(token: &str, entity: Option<&str>) -> Self {
        Self {
            token: token.into(),
            slots: Vec::new(),
            payload: Payload::with_entity(entity),
        }
    }

    fn slot(&self, distance: Distance) -> Option<NodeId> {
        self.slots.get(distance).copied().filter(|&id| id != NO_CHILD)
    }

    fn heap_bytes(&self) -> usize {
        self.token.len()
            + self.slots.capacity() * std::mem::size_of::<NodeId>()
            + self.payload.heap_bytes()
    }
}

impl StoredNode for ArenaNode {
    fn token(&self) -> &str {
        &self.token
    }

    fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Nodes in one flat vector; edges are distance-indexed slot tables of handles.
///
/// The root is always node 0. Nodes are only ever appended, so a handle stays
/// valid for the lifetime of the store. When the vector reaches `capacity` it
/// doubles, unless growth is disabled.
#[derive(Debug, Clone)]
pub struct ArenaStore {
    nodes: Vec<ArenaNode>,
    capacity: usize,
    allow_growth: bool,
}

impl ArenaStore {
    pub fn new() -> Self {
        Self::with_capacity(IndexConfig::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
            allow_growth: true,
        }
    }

    /// An arena that refuses to grow past `capacity` nodes.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            allow_growth: false,
            ..Self::with_capacity(capacity)
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        if config.allow_growth {
            Self::with_capacity(config.initial_capacity)
        } else {
            Self::fixed(config.initial_capacity)
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn node(&self, id: NodeId) -> Option<&ArenaNode> {
        self.nodes.get(id as usize)
    }

    /// Handle of the child of `id` at `distance`.
    pub fn child_id(&self, id: NodeId, distance: Distance) -> Option<NodeId> {
        self.node(id)?.slot(distance)
    }

    fn ensure_room(&mut self) -> Result<(), IndexError> {
        let len = self.nodes.len();
        if len < self.capacity && len < NO_CHILD as usize {
            return Ok(());
        }
        if !self.allow_growth || len >= NO_CHILD as usize {
            warn!(capacity = self.capacity, "arena full, rejecting insert");
            return Err(IndexError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let new_capacity = self
            .capacity
            .max(1)
            .saturating_mul(2)
            .min(NO_CHILD as usize);
        self.nodes.reserve_exact(new_capacity - len);
        debug!(from = self.capacity, to = new_capacity, "arena grew");
        self.capacity = new_capacity;
        Ok(())
    }
}

impl Default for ArenaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for ArenaStore {
    type Node = ArenaNode;

    const NAME: &'static str = "arena";

    fn root(&self) -> Option<&ArenaNode> {
        self.nodes.first()
    }

    fn child<'a>(&'a self, parent: &'a ArenaNode, distance: Distance) -> Option<&'a ArenaNode> {
        parent
            .slot(distance)
            .map(|id| &self.nodes[id as usize])
    }

    fn max_child_distance(&self, parent: &ArenaNode) -> Option<Distance> {
        parent.slots.len().checked_sub(1)
    }

    fn children<'a>(
        &'a self,
        parent: &'a ArenaNode,
    ) -> impl Iterator<Item = (Distance, &'a ArenaNode)> + 'a {
        parent
            .slots
            .iter()
            .enumerate()
            .filter(|&(_, &id)| id != NO_CHILD)
            .map(move |(d, &id)| (d, &self.nodes[id as usize]))
    }

    fn insert<M: Metric>(
        &mut self,
        token: &str,
        entity: Option<&str>,
    ) -> Result<InsertOutcome, IndexError> {
        if self.nodes.is_empty() {
            self.ensure_room()?;
            self.nodes.push(ArenaNode::new(token, entity));
            trace!(token, "arena root");
            return Ok(InsertOutcome::Inserted);
        }

        let mut current = 0usize;
        loop {
            let node = &self.nodes[current];
            let d = M::distance(token, &node.token);
            if d == 0 {
                self.nodes[current].payload.record(entity);
                return Ok(InsertOutcome::Duplicate);
            }

            if let Some(next) = node.slot(d) {
                current = next as usize;
                continue;
            }

            // Reserve before touching the parent so a refusal leaves no dangling slot.
            self.ensure_room()?;
            let id = NodeId::try_from(self.nodes.len()).map_err(|_| {
                IndexError::CapacityExceeded {
                    capacity: self.capacity,
                }
            })?;
            self.nodes.push(ArenaNode::new(token, entity));

            let slots = &mut self.nodes[current].slots;
            if slots.len() <= d {
                slots.resize(d + 1, NO_CHILD);
            }
            slots[d] = id;
            trace!(token, parent = current, distance = d, id, "arena insert");
            return Ok(InsertOutcome::Inserted);
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn heap_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<ArenaNode>()
            + self.nodes.iter().map(ArenaNode::heap_bytes).sum::<usize>()
    }
}
