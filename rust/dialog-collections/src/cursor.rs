use std::iter::FusedIterator;

use crate::{NodeId, Payload, RbTree, Release};

/// The address of a single element in a tree: a node and one of its slots.
///
/// A position is a plain value detached from the tree it came from, so it
/// can be held across mutations and handed back to `erase`. The _end_
/// position addresses no element; it sits after the last element and before
/// the first, so stepping forward from it wraps around to the beginning.
///
/// A position stays valid while other elements are inserted or erased, and
/// only erasing the addressed element invalidates it. A stale position
/// addresses nothing: reading through it yields `None`, erasing through it
/// does nothing, and stepping from it lands on the end position. Within a
/// multiset node, erasing one occurrence shifts the later occurrences of the
/// same key down by one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    node: Option<NodeId>,
    slot: usize,
}

impl Position {
    /// The end position.
    pub const END: Position = Position {
        node: None,
        slot: 0,
    };

    pub(crate) fn at(node: NodeId, slot: usize) -> Self {
        Self {
            node: Some(node),
            slot,
        }
    }

    pub(crate) fn first_slot_of(node: Option<NodeId>) -> Self {
        node.map(|node| Self::at(node, 0)).unwrap_or(Self::END)
    }

    /// The node holding the addressed element.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// The slot of the addressed element within its node.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Returns `true` for the end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::END
    }
}

/// What [`RbTree::take`] removed from the tree.
#[derive(Debug, PartialEq, Eq)]
pub enum Taken<K, P> {
    /// A single slot of a node that still holds other slots.
    Slot(K),
    /// A whole node.
    Node(K, P),
}

impl<K, P> RbTree<K, P>
where
    P: Payload<K>,
{
    /// The position of the first element, or the end position when empty.
    pub fn begin(&self) -> Position {
        Position::first_slot_of(self.first())
    }

    /// The end position.
    pub fn end(&self) -> Position {
        Position::END
    }

    /// The position of the last slot of a node.
    fn last_slot_of(&self, node: Option<NodeId>) -> Position {
        node.and_then(|id| {
            let slots = self.payload(id)?.slots();
            Some(Position::at(id, slots.saturating_sub(1)))
        })
        .unwrap_or(Position::END)
    }

    /// The position after `position`. Within a node this advances through
    /// the slots, then moves to the first slot of the successor node.
    pub fn next_position(&self, position: Position) -> Position {
        let Some(id) = position.node else {
            return self.begin();
        };
        let Some(payload) = self.payload(id) else {
            return Position::END;
        };

        if position.slot + 1 < payload.slots() {
            Position::at(id, position.slot + 1)
        } else {
            Position::first_slot_of(self.next_node(id))
        }
    }

    /// The position before `position`. Within a node this steps back through
    /// the slots, then moves to the last slot of the predecessor node.
    pub fn prev_position(&self, position: Position) -> Position {
        let Some(id) = position.node else {
            return self.last_slot_of(self.last());
        };
        if self.node(id).is_none() {
            return Position::END;
        }

        if position.slot > 0 {
            Position::at(id, position.slot - 1)
        } else {
            self.last_slot_of(self.prev_node(id))
        }
    }

    /// The element at `position`.
    pub fn item(&self, position: Position) -> Option<P::Item<'_>> {
        let node = self.node(position.node?)?;
        P::item(&node.key, &node.payload, position.slot)
    }

    /// A cursor over this tree, starting at `position`.
    pub fn cursor(&self, position: Position) -> Cursor<'_, K, P> {
        Cursor {
            tree: self,
            position,
        }
    }

    /// Iterates the elements in `[from, to)`.
    pub fn range(&self, from: Position, to: Position) -> Iter<'_, K, P> {
        Iter {
            tree: self,
            front: from,
            back: to,
            remaining: None,
        }
    }

    /// Iterates every element in order.
    pub fn iter(&self) -> Iter<'_, K, P> {
        self.range(self.begin(), self.end())
    }

    /// Removes the element at `position` and returns it together with the
    /// position of the element that followed it.
    ///
    /// When the node holds further slots only the addressed slot is removed
    /// and the node stays in place; otherwise the node leaves the tree.
    /// Returns `None` for the end position or a stale position.
    pub fn take(&mut self, position: Position) -> Option<(Taken<K, P>, Position)> {
        let id = position.node?;
        let (key, payload) = self.entry_mut(id)?;
        if position.slot >= payload.slots() {
            return None;
        }

        match P::release(key, payload, position.slot) {
            Release::Slot(released) => {
                let remaining = payload.slots();
                let next = if position.slot < remaining {
                    Position::at(id, position.slot)
                } else {
                    Position::first_slot_of(self.next_node(id))
                };
                Some((Taken::Slot(released), next))
            }
            Release::Node => {
                let removed = self.remove_node(id)?;
                Some((
                    Taken::Node(removed.key, removed.payload),
                    Position::first_slot_of(removed.next),
                ))
            }
        }
    }
}

impl<K, P> RbTree<K, P>
where
    K: Ord,
    P: Payload<K>,
{
    /// Inserts `key` under the payload's duplicate policy.
    ///
    /// If an equal key is present the payload decides: it either absorbs the
    /// key into a new slot (returning that slot and `true`), or rejects it
    /// (returning the existing element and `false`). Otherwise a new node is
    /// created with the payload produced by `payload`.
    pub fn insert_with<F>(&mut self, key: K, payload: F) -> (Position, bool)
    where
        F: FnOnce() -> P,
    {
        if let Some(id) = self.search(&key) {
            let Some(existing) = self.payload_mut(id) else {
                return (Position::END, false);
            };
            return match existing.absorb(key) {
                Ok(slot) => (Position::at(id, slot), true),
                Err(_) => (Position::at(id, 0), false),
            };
        }

        let id = self.insert_node(key, payload());
        (Position::at(id, 0), true)
    }

    /// The position of the first slot of the node holding `key`, or the end
    /// position.
    pub fn find(&self, key: &K) -> Position {
        Position::first_slot_of(self.search(key))
    }
}

/// A read-only cursor over the elements of an [`RbTree`].
///
/// The cursor borrows the tree because stepping needs the parent links, not
/// just the current node.
#[derive(Debug)]
pub struct Cursor<'a, K, P> {
    tree: &'a RbTree<K, P>,
    position: Position,
}

impl<K, P> Clone for Cursor<'_, K, P> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            position: self.position,
        }
    }
}

impl<'a, K, P> Cursor<'a, K, P>
where
    K: 'a,
    P: Payload<K> + 'a,
{
    /// The position the cursor points at.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns `true` when the cursor points at the end position.
    pub fn is_end(&self) -> bool {
        self.position.is_end()
    }

    /// The element under the cursor.
    pub fn current(&self) -> Option<P::Item<'a>> {
        self.tree.item(self.position)
    }

    /// Steps to the next element, wrapping from the end to the first one.
    pub fn move_next(&mut self) {
        self.position = self.tree.next_position(self.position);
    }

    /// Steps to the previous element, wrapping from the first one to the end.
    pub fn move_prev(&mut self) {
        self.position = self.tree.prev_position(self.position);
    }
}

/// An in-order iterator over a range of positions of an [`RbTree`].
///
/// Iterators over a whole container know how many elements they will yield
/// and report it through `size_hint`; iterators over an arbitrary range do
/// not.
#[derive(Debug)]
pub struct Iter<'a, K, P> {
    tree: &'a RbTree<K, P>,
    front: Position,
    back: Position,
    remaining: Option<usize>,
}

impl<K, P> Clone for Iter<'_, K, P> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K, P> Iter<'_, K, P> {
    /// Records that exactly `len` elements lie between the two ends.
    pub(crate) fn counted(mut self, len: usize) -> Self {
        self.remaining = Some(len);
        self
    }

    fn exhaust(&mut self) {
        self.front = self.back;
        self.remaining = self.remaining.map(|_| 0);
    }

    fn consumed(&mut self) {
        self.remaining = self.remaining.map(|remaining| remaining.saturating_sub(1));
    }
}

impl<'a, K, P> Iterator for Iter<'a, K, P>
where
    K: 'a,
    P: Payload<K> + 'a,
{
    type Item = P::Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back || self.front.is_end() {
            self.exhaust();
            return None;
        }

        let Some(item) = self.tree.item(self.front) else {
            self.exhaust();
            return None;
        };
        self.front = self.tree.next_position(self.front);
        self.consumed();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(remaining) => (remaining, Some(remaining)),
            None if self.front == self.back => (0, Some(0)),
            None => (0, None),
        }
    }
}

impl<'a, K, P> DoubleEndedIterator for Iter<'a, K, P>
where
    K: 'a,
    P: Payload<K> + 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let back = self.tree.prev_position(self.back);
        if back.is_end() {
            self.exhaust();
            return None;
        }
        self.back = back;
        let item = self.tree.item(back);
        match item {
            Some(_) => self.consumed(),
            None => self.exhaust(),
        }
        item
    }
}

impl<'a, K, P> FusedIterator for Iter<'a, K, P>
where
    K: 'a,
    P: Payload<K> + 'a,
{
}
