use slab::Slab;
use tracing::trace;

use crate::{Color, Node, NodeId};

/// Which child of a node an operation is concerned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A node that was unlinked from the tree by [`RbTree::remove_node`].
#[derive(Debug)]
pub struct Removed<K, P> {
    /// The key of the removed element.
    pub key: K,
    /// The payload of the removed element.
    pub payload: P,
    /// The node that now holds the element which followed the removed one in
    /// key order, if any.
    pub next: Option<NodeId>,
}

/// A red-black tree of keys `K`, each carrying a payload `P`.
///
/// This is the balancing engine shared by [`OrderedSet`](crate::OrderedSet),
/// [`OrderedMap`](crate::OrderedMap) and
/// [`OrderedMultiset`](crate::OrderedMultiset). Nodes live in an arena and
/// refer to each other by [`NodeId`], so rotations and transplants are plain
/// index reassignments.
///
/// The tree has no notion of key uniqueness: [`RbTree::insert_node`] always
/// attaches a new node. Containers layer their duplicate policy on top by
/// searching first (see [`Payload`](crate::Payload)).
///
/// After every public mutation the tree satisfies the red-black invariants:
/// the root is black, no red node has a red child, and every path from a
/// node to an absent leaf crosses the same number of black nodes. See
/// [`RbTree::validate`].
#[derive(Clone, Debug)]
pub struct RbTree<K, P> {
    nodes: Slab<Node<K, P>>,
    root: Option<NodeId>,
    generation: u64,
}

impl<K, P> Default for RbTree<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> RbTree<K, P> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            generation: 0,
        }
    }

    /// The root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns `true` if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of nodes currently allocated.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The largest number of nodes a tree of this type could ever address.
    pub fn max_nodes() -> usize {
        isize::MAX as usize / std::mem::size_of::<Node<K, P>>().max(1)
    }

    /// Drops every node. Ids issued before clearing stay stale even once
    /// new nodes reuse their arena slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Looks up a node by id. Returns `None` once the node has been removed.
    pub fn node(&self, id: NodeId) -> Option<&Node<K, P>> {
        self.nodes
            .get(id.index)
            .filter(|node| node.generation == id.generation)
    }

    /// The key held by a node.
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(|node| &node.key)
    }

    /// The color of a node.
    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.node(id).map(|node| node.color)
    }

    /// The payload held by a node.
    pub fn payload(&self, id: NodeId) -> Option<&P> {
        self.node(id).map(|node| &node.payload)
    }

    /// The payload held by a node, mutably. The key is never exposed
    /// mutably, so the tree order cannot be disturbed through this.
    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut P> {
        self.nodes
            .get_mut(id.index)
            .filter(|node| node.generation == id.generation)
            .map(|node| &mut node.payload)
    }

    /// The payload of a node that is known to be live.
    pub(crate) fn live_payload_mut(&mut self, id: NodeId) -> &mut P {
        &mut self.link_mut(id).payload
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> Option<(&mut K, &mut P)> {
        self.nodes
            .get_mut(id.index)
            .filter(|node| node.generation == id.generation)
            .map(|node| (&mut node.key, &mut node.payload))
    }

    /// The leftmost node of the subtree rooted at `from`, or of the whole
    /// tree when `from` is `None`.
    pub fn min(&self, from: Option<NodeId>) -> Option<NodeId> {
        let mut current = from.or(self.root)?;
        while let Some(left) = self.child(current, Side::Left) {
            current = left;
        }
        Some(current)
    }

    /// The rightmost node of the subtree rooted at `from`, or of the whole
    /// tree when `from` is `None`.
    pub fn max(&self, from: Option<NodeId>) -> Option<NodeId> {
        let mut current = from.or(self.root)?;
        while let Some(right) = self.child(current, Side::Right) {
            current = right;
        }
        Some(current)
    }

    /// The node with the smallest key.
    pub fn first(&self) -> Option<NodeId> {
        self.min(None)
    }

    /// The node with the largest key.
    pub fn last(&self) -> Option<NodeId> {
        self.max(None)
    }

    /// The in-order successor of a node.
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, Side::Right)
    }

    /// The in-order predecessor of a node.
    pub fn prev_node(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, Side::Left)
    }

    /// Moves one node in key order: into the subtree on `side` if there is
    /// one, otherwise up until we arrive from the opposite side.
    fn step(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.node(id)?;

        if let Some(child) = self.child(id, side) {
            let mut current = child;
            while let Some(next) = self.child(current, side.opposite()) {
                current = next;
            }
            return Some(current);
        }

        let mut current = id;
        let mut parent = self.parent(current);
        while let Some(up) = parent {
            if self.child(up, side) != Some(current) {
                return Some(up);
            }
            current = up;
            parent = self.parent(up);
        }
        None
    }

    fn link(&self, id: NodeId) -> &Node<K, P> {
        &self.nodes[id.index]
    }

    fn link_mut(&mut self, id: NodeId) -> &mut Node<K, P> {
        &mut self.nodes[id.index]
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, P> {
        self.link_mut(id)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.link(id).parent
    }

    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        let node = self.link(id);
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
        }
    }

    fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        let node = self.link_mut(id);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// Absent leaves count as black.
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.link(id).color.is_red())
    }

    fn paint(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.link_mut(id).color = color;
        }
    }

    fn side_of(&self, parent: NodeId, child: Option<NodeId>) -> Side {
        if self.child(parent, Side::Left) == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whatever referenced `old` (its parent, or the root) at `new`.
    /// This is the transplant step of deletion; `new`'s own parent link is
    /// left to the caller.
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        match self.parent(old) {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, Some(old));
                self.set_child(parent, side, new);
            }
        }
        if let Some(new) = new {
            let parent = self.parent(old);
            self.link_mut(new).parent = parent;
        }
    }

    /// Rotates the subtree rooted at `pivot` towards `side`: the child on the
    /// opposite side takes the pivot's place and the pivot becomes its child.
    /// In-order sequence is preserved.
    fn rotate(&mut self, pivot: NodeId, side: Side) {
        let Some(heir) = self.child(pivot, side.opposite()) else {
            return;
        };
        trace!(%pivot, %heir, ?side, "rotate");

        let inner = self.child(heir, side);
        self.set_child(pivot, side.opposite(), inner);
        if let Some(inner) = inner {
            self.link_mut(inner).parent = Some(pivot);
        }

        self.transplant(pivot, Some(heir));

        self.set_child(heir, side, Some(pivot));
        self.link_mut(pivot).parent = Some(heir);
    }

    fn left_rotate(&mut self, x: NodeId) {
        self.rotate(x, Side::Left);
    }

    fn right_rotate(&mut self, y: NodeId) {
        self.rotate(y, Side::Right);
    }

    fn rotate_toward(&mut self, pivot: NodeId, side: Side) {
        match side {
            Side::Left => self.left_rotate(pivot),
            Side::Right => self.right_rotate(pivot),
        }
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.parent(node).filter(|parent| self.is_red(Some(*parent))) {
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.parent(parent) else {
                break;
            };
            let side = self.side_of(grandparent, Some(parent));
            let uncle = self.child(grandparent, side.opposite());

            if self.is_red(uncle) {
                trace!(%node, "insert fixup: red uncle");
                self.paint(Some(parent), Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(Some(grandparent), Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.child(parent, side.opposite()) == Some(node) {
                trace!(%node, "insert fixup: inner child");
                node = parent;
                self.rotate_toward(node, side);
                parent = self.parent(node).unwrap_or(node);
            }

            trace!(%node, "insert fixup: outer child");
            self.paint(Some(parent), Color::Black);
            self.paint(Some(grandparent), Color::Red);
            self.rotate_toward(grandparent, side.opposite());
            break;
        }

        let root = self.root;
        self.paint(root, Color::Black);
    }

    /// Restores the black height after a black node was spliced out. `node`
    /// is the child that took its place (possibly absent), `parent` is where
    /// the splice happened.
    fn remove_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.root && !self.is_red(node) {
            let Some(up) = parent else {
                break;
            };
            let side = self.side_of(up, node);

            let Some(mut sibling) = self.child(up, side.opposite()) else {
                break;
            };

            if self.is_red(Some(sibling)) {
                trace!(%up, "remove fixup: red sibling");
                self.paint(Some(sibling), Color::Black);
                self.paint(Some(up), Color::Red);
                self.rotate_toward(up, side);
                match self.child(up, side.opposite()) {
                    Some(next) => sibling = next,
                    None => break,
                }
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                trace!(%up, "remove fixup: black nephews");
                self.paint(Some(sibling), Color::Red);
                node = Some(up);
                parent = self.parent(up);
                continue;
            }

            if !self.is_red(far) {
                trace!(%up, "remove fixup: red near nephew");
                self.paint(near, Color::Black);
                self.paint(Some(sibling), Color::Red);
                self.rotate_toward(sibling, side.opposite());
                match self.child(up, side.opposite()) {
                    Some(next) => sibling = next,
                    None => break,
                }
            }

            trace!(%up, "remove fixup: red far nephew");
            let color = self.link(up).color;
            self.paint(Some(sibling), color);
            self.paint(Some(up), Color::Black);
            let far = self.child(sibling, side.opposite());
            self.paint(far, Color::Black);
            self.rotate_toward(up, side);
            node = self.root;
            parent = None;
        }

        self.paint(node, Color::Black);
    }

    /// Unlinks a node from the tree and rebalances.
    ///
    /// A node with two children is replaced by its in-order successor, which
    /// is relinked into its place. Only `id` leaves the arena, so every other
    /// id stays valid.
    ///
    /// Returns `None` if `id` does not refer to a live node.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Removed<K, P>> {
        self.node(id)?;
        let next = self.next_node(id);

        let left = self.child(id, Side::Left);
        let right = self.child(id, Side::Right);
        let mut spliced_color = self.link(id).color;

        let (child, parent) = match (left, right) {
            (None, _) => {
                let parent = self.parent(id);
                self.transplant(id, right);
                (right, parent)
            }
            (Some(_), None) => {
                let parent = self.parent(id);
                self.transplant(id, left);
                (left, parent)
            }
            (Some(left), Some(right)) => {
                let successor = self.min(Some(right)).unwrap_or(right);
                spliced_color = self.link(successor).color;
                let child = self.child(successor, Side::Right);

                let parent = if self.parent(successor) == Some(id) {
                    successor
                } else {
                    let parent = self.parent(successor).unwrap_or(id);
                    self.transplant(successor, child);
                    self.set_child(successor, Side::Right, Some(right));
                    self.link_mut(right).parent = Some(successor);
                    parent
                };

                self.transplant(id, Some(successor));
                self.set_child(successor, Side::Left, Some(left));
                self.link_mut(left).parent = Some(successor);
                let color = self.link(id).color;
                self.link_mut(successor).color = color;

                (child, Some(parent))
            }
        };

        let removed = self.nodes.remove(id.index);
        trace!(node = %id, color = ?spliced_color, "unlinked");

        if spliced_color == Color::Black {
            self.remove_fixup(child, parent);
        }

        Some(Removed {
            key: removed.key,
            payload: removed.payload,
            next,
        })
    }
}

impl<K, P> RbTree<K, P>
where
    K: Ord,
{
    /// Finds a node whose key equals `key`.
    pub fn search(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.link(id);
            current = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// The first node whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(id) = current {
            let node = self.link(id);
            if node.key >= *key {
                candidate = Some(id);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        candidate
    }

    /// The first node whose key is greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Option<NodeId> {
        let Some(found) = self.search(key) else {
            return self.lower_bound(key);
        };

        let mut next = self.next_node(found);
        while let Some(id) = next {
            if self.link(id).key != *key {
                break;
            }
            next = self.next_node(id);
        }
        next
    }

    /// The node holding the next greater key after `key`. Returns `None`
    /// when `key` is the largest key or is not in the tree.
    pub fn successor(&self, key: &K) -> Option<NodeId> {
        self.search(key).and_then(|id| self.next_node(id))
    }

    /// The node holding the next smaller key before `key`. Returns `None`
    /// when `key` is the smallest key or is not in the tree.
    pub fn predecessor(&self, key: &K) -> Option<NodeId> {
        self.search(key).and_then(|id| self.prev_node(id))
    }

    /// Attaches a new red node at its binary-search position and rebalances.
    /// Equal keys descend to the right, so the new node lands after any
    /// existing equal keys.
    pub fn insert_node(&mut self, key: K, payload: P) -> NodeId {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(id) = current {
            parent = Some(id);
            side = if key < self.link(id).key {
                Side::Left
            } else {
                Side::Right
            };
            current = self.child(id, side);
        }

        self.generation += 1;
        let generation = self.generation;
        let index = self.nodes.insert(Node::new(generation, key, payload));
        let id = NodeId { index, generation };
        self.link_mut(id).parent = parent;

        match parent {
            None => self.root = Some(id),
            Some(parent) => self.set_child(parent, side, Some(id)),
        }
        trace!(node = %id, "inserted");

        self.insert_fixup(id);
        id
    }

    /// Removes the node holding `key`. Absent keys are ignored.
    pub fn remove(&mut self, key: &K) -> Option<(K, P)> {
        let id = self.search(key)?;
        self.remove_node(id)
            .map(|removed| (removed.key, removed.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn keys<P>(tree: &RbTree<i32, P>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut current = tree.first();
        while let Some(id) = current {
            keys.extend(tree.key(id).copied());
            current = tree.next_node(id);
        }
        keys
    }

    fn tree_of(keys: &[i32]) -> RbTree<i32, ()> {
        let mut tree = RbTree::new();
        for key in keys {
            tree.insert_node(*key, ());
        }
        tree
    }

    #[test]
    fn it_starts_empty() -> Result<()> {
        let tree = RbTree::<i32, ()>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.search(&1), None);
        tree.validate()?;
        Ok(())
    }

    #[test]
    fn it_colors_the_root_black() -> Result<()> {
        let tree = tree_of(&[1]);
        let root = tree.root().ok_or(anyhow::anyhow!("missing root"))?;
        assert_eq!(tree.node(root).map(|node| node.color()), Some(Color::Black));
        Ok(())
    }

    #[test]
    fn it_rebalances_ascending_inserts() -> Result<()> {
        let tree = tree_of(&[1, 2, 3]);
        let root = tree.root().ok_or(anyhow::anyhow!("missing root"))?;
        assert_eq!(tree.key(root), Some(&2));
        assert_eq!(tree.validate()?, 1);

        let tree = tree_of(&(0..1000).collect::<Vec<_>>());
        let height = tree.validate()?;
        // n nodes admit a black height of at most log2(n + 1) + 1.
        assert!(height <= 10, "black height {height} too large");
        Ok(())
    }

    #[test]
    fn it_rotates_without_reordering() -> Result<()> {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let root = tree.root().ok_or(anyhow::anyhow!("missing root"))?;

        tree.left_rotate(root);
        assert_eq!(tree.key(tree.root().unwrap_or(root)), Some(&6));
        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7]);

        let root = tree.root().unwrap_or(root);
        tree.right_rotate(root);
        assert_eq!(tree.key(tree.root().unwrap_or(root)), Some(&4));
        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        tree.validate()?;
        Ok(())
    }

    #[test]
    fn it_ignores_rotation_without_an_heir() -> Result<()> {
        let mut tree = tree_of(&[1]);
        let root = tree.root().ok_or(anyhow::anyhow!("missing root"))?;
        tree.left_rotate(root);
        tree.right_rotate(root);
        assert_eq!(tree.root(), Some(root));
        Ok(())
    }

    #[test]
    fn it_finds_minimum_and_maximum_of_subtrees() -> Result<()> {
        let tree = tree_of(&[14, 4, 18, 3, 8, 21, 6, 11, 5, 1]);
        assert_eq!(tree.first().and_then(|id| tree.key(id)), Some(&1));
        assert_eq!(tree.last().and_then(|id| tree.key(id)), Some(&21));

        let eight = tree.search(&8).ok_or(anyhow::anyhow!("missing 8"))?;
        let subtree_max = tree.max(Some(eight)).and_then(|id| tree.key(id));
        let subtree_min = tree.min(Some(eight)).and_then(|id| tree.key(id));
        assert!(subtree_min.is_some_and(|key| *key <= 8));
        assert!(subtree_max.is_some_and(|key| *key >= 8));
        Ok(())
    }

    #[test]
    fn it_replays_a_long_insert_and_remove_script() -> Result<()> {
        let mut tree = tree_of(&[14, 4, 18, 3, 8, 21, 6, 11, 5, 1]);
        tree.remove(&8);
        tree.remove(&5);
        tree.validate()?;

        for key in [9, 10, 8, 7, 13] {
            tree.insert_node(key, ());
        }
        for key in [6, 14, 13, 4] {
            tree.remove(&key);
        }
        for key in [4, 2, 6, 20, 19, 17, 16] {
            tree.insert_node(key, ());
        }
        for key in [18, 20, 8, 10] {
            tree.remove(&key);
        }
        tree.validate()?;

        let expected = vec![1, 2, 3, 4, 6, 7, 9, 11, 16, 17, 19, 21];

        let mut walked = Vec::new();
        let mut current = tree.last().and_then(|id| tree.key(id)).copied();
        while let Some(key) = current {
            walked.push(key);
            current = tree.predecessor(&key).and_then(|id| tree.key(id)).copied();
        }
        walked.reverse();

        assert_eq!(walked, expected);
        assert_eq!(keys(&tree), expected);
        Ok(())
    }

    #[test]
    fn it_reports_no_successor_or_predecessor_at_the_ends() -> Result<()> {
        let tree = tree_of(&[2, 1, 3]);
        assert_eq!(tree.successor(&3), None);
        assert_eq!(tree.predecessor(&1), None);
        assert_eq!(tree.successor(&1).and_then(|id| tree.key(id)), Some(&2));
        assert_eq!(tree.predecessor(&3).and_then(|id| tree.key(id)), Some(&2));
        assert_eq!(tree.successor(&42), None);
        Ok(())
    }

    #[test]
    fn it_ignores_removal_of_absent_keys() -> Result<()> {
        let mut tree = tree_of(&[5, 3, 7]);
        assert!(tree.remove(&4).is_none());
        assert_eq!(keys(&tree), vec![3, 5, 7]);
        assert_eq!(tree.node_count(), 3);
        tree.validate()?;
        Ok(())
    }

    #[test]
    fn it_relinks_the_successor_into_a_node_with_two_children() -> Result<()> {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let four = tree.search(&4).ok_or(anyhow::anyhow!("missing 4"))?;
        let five = tree.search(&5).ok_or(anyhow::anyhow!("missing 5"))?;

        let removed = tree
            .remove_node(four)
            .ok_or(anyhow::anyhow!("nothing removed"))?;
        assert_eq!(removed.key, 4);
        assert_eq!(removed.next, Some(five));
        assert_eq!(tree.key(four), None);
        assert_eq!(tree.key(five), Some(&5));
        assert_eq!(tree.root(), Some(five));
        assert_eq!(keys(&tree), vec![1, 2, 3, 5, 6, 7]);
        tree.validate()?;
        Ok(())
    }

    #[test]
    fn it_relinks_a_successor_deeper_than_the_right_child() -> Result<()> {
        let mut tree = tree_of(&(1..=20).collect::<Vec<_>>());
        let ids: Vec<_> = (1..=20)
            .map(|key| tree.search(&key).ok_or(anyhow::anyhow!("missing {key}")))
            .collect::<Result<_>>()?;

        for key in [8, 4, 12, 16, 2] {
            tree.remove(&key);
            tree.validate()?;
        }

        for (key, id) in (1..=20).zip(ids) {
            if [8, 4, 12, 16, 2].contains(&key) {
                assert_eq!(tree.key(id), None);
            } else {
                assert_eq!(tree.key(id), Some(&key));
            }
        }
        Ok(())
    }

    #[test]
    fn it_never_resolves_ids_of_removed_nodes() -> Result<()> {
        let mut tree = tree_of(&[2, 1, 3]);
        let one = tree.search(&1).ok_or(anyhow::anyhow!("missing 1"))?;
        tree.remove(&1);

        let zero = tree.insert_node(0, ());
        assert_eq!(zero.index(), one.index());
        assert_ne!(zero.generation(), one.generation());
        assert!(tree.node(one).is_none());
        assert!(tree.remove_node(one).is_none());
        assert_eq!(tree.key(zero), Some(&0));

        tree.clear();
        let fresh = tree.insert_node(5, ());
        assert_ne!(fresh, zero);
        assert_eq!(tree.key(zero), None);
        Ok(())
    }

    #[test]
    fn it_bounds_keys_in_either_direction() -> Result<()> {
        let tree = tree_of(&[10, 20, 30]);
        let key = |id: Option<NodeId>| id.and_then(|id| tree.key(id)).copied();

        assert_eq!(key(tree.lower_bound(&5)), Some(10));
        assert_eq!(key(tree.lower_bound(&20)), Some(20));
        assert_eq!(key(tree.lower_bound(&25)), Some(30));
        assert_eq!(key(tree.lower_bound(&31)), None);

        assert_eq!(key(tree.upper_bound(&5)), Some(10));
        assert_eq!(key(tree.upper_bound(&20)), Some(30));
        assert_eq!(key(tree.upper_bound(&30)), None);
        Ok(())
    }

    #[test]
    fn it_keeps_equal_keys_adjacent() -> Result<()> {
        let tree = tree_of(&[2, 1, 2, 3, 2]);
        assert_eq!(keys(&tree), vec![1, 2, 2, 2, 3]);
        assert_eq!(
            tree.upper_bound(&2).and_then(|id| tree.key(id)),
            Some(&3)
        );
        tree.validate()?;
        Ok(())
    }

    #[test]
    fn it_clears_all_nodes() -> Result<()> {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        Ok(())
    }
}
