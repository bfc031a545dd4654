use std::fmt::Display;

/// Identifies a node inside the arena of an [`RbTree`](crate::RbTree).
///
/// Ids are stable for the lifetime of the node: rotations and removals of
/// other nodes relink it but never move it. Every allocation gets a fresh
/// generation, so an id kept past the removal of its node never resolves to
/// a node allocated later in the same arena slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

impl NodeId {
    /// The arena index backing this id.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The allocation generation of the node this id was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// The color of a red-black tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// A red node. Never the parent of another red node.
    Red,
    /// A black node. Counted by the black-height invariant.
    Black,
}

impl Color {
    pub(crate) fn is_red(&self) -> bool {
        *self == Color::Red
    }
}

/// A single node of the tree: a key, the adapter-defined payload, and the
/// links to its neighbours in the arena.
#[derive(Clone, Debug)]
pub struct Node<K, P> {
    pub(crate) generation: u64,
    pub(crate) key: K,
    pub(crate) payload: P,
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, P> Node<K, P> {
    /// New nodes start red and detached.
    pub(crate) fn new(generation: u64, key: K, payload: P) -> Self {
        Self {
            generation,
            key,
            payload,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The payload stored alongside the key.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The color of this node.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The parent of this node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The left child of this node.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The right child of this node.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }
}
