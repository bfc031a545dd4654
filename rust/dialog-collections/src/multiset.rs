use std::fmt::Debug;

use tracing::trace;

use crate::{Cursor, DialogCollectionsError, Duplicates, Iter, Payload, Position, RbTree};

/// An ordered multiset: keys may repeat, and every occurrence is kept.
///
/// All occurrences of a key share one tree node, each in its own slot, so
/// inserting a repeat never rebalances the tree. Occurrences of a key are
/// visited in insertion order.
///
/// ```
/// use dialog_collections::OrderedMultiset;
///
/// let mut bag = OrderedMultiset::from([1, 2, 2, 2, 3]);
/// assert_eq!(bag.count(&2), 3);
///
/// let (from, to) = bag.equal_range(&2);
/// bag.erase(from);
/// assert_eq!(bag.count(&2), 2);
/// assert!(bag.get(to) == Some(&3));
/// ```
#[derive(Clone)]
pub struct OrderedMultiset<K> {
    tree: RbTree<K, Duplicates<K>>,
    len: usize,
}

impl<K> Default for OrderedMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OrderedMultiset<K> {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
            len: 0,
        }
    }

    /// The total number of occurrences held, counting repeats.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the multiset holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The largest number of distinct keys a multiset of this type could
    /// hold.
    pub fn max_size(&self) -> usize {
        RbTree::<K, Duplicates<K>>::max_nodes()
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Exchanges the contents of two multisets.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// The underlying tree.
    pub fn tree(&self) -> &RbTree<K, Duplicates<K>> {
        &self.tree
    }

    /// Iterates every occurrence in ascending order.
    pub fn iter(&self) -> Iter<'_, K, Duplicates<K>> {
        self.tree.iter().counted(self.len)
    }

    /// Iterates the occurrences in `[from, to)`.
    pub fn range(&self, from: Position, to: Position) -> Iter<'_, K, Duplicates<K>> {
        self.tree.range(from, to)
    }

    /// The position of the first occurrence of the smallest key.
    pub fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// The end position.
    pub fn end(&self) -> Position {
        self.tree.end()
    }

    /// The position after `position`: the next slot of the same node, or the
    /// first slot of the next node.
    pub fn next(&self, position: Position) -> Position {
        self.tree.next_position(position)
    }

    /// The position before `position`: the previous slot of the same node,
    /// or the last slot of the previous node.
    pub fn prev(&self, position: Position) -> Position {
        self.tree.prev_position(position)
    }

    /// The occurrence at `position`.
    pub fn get(&self, position: Position) -> Option<&K> {
        self.tree.item(position)
    }

    /// A cursor starting at `position`.
    pub fn cursor(&self, position: Position) -> Cursor<'_, K, Duplicates<K>> {
        self.tree.cursor(position)
    }

    /// The smallest key.
    pub fn first(&self) -> Option<&K> {
        self.get(self.begin())
    }

    /// The largest key (its most recently inserted occurrence).
    pub fn last(&self) -> Option<&K> {
        self.get(self.prev(self.end()))
    }

    /// Removes exactly the occurrence at `position` and returns the position
    /// of the occurrence that followed it. The node only leaves the tree
    /// once its last occurrence is erased. Erasing the end position does
    /// nothing.
    pub fn erase(&mut self, position: Position) -> Position {
        match self.tree.take(position) {
            Some((_, next)) => {
                self.len -= 1;
                next
            }
            None => position,
        }
    }
}

impl<K> OrderedMultiset<K>
where
    K: Ord,
{
    /// Inserts an occurrence of `key` and returns its position. A repeated
    /// key lands in a new slot after the existing occurrences.
    pub fn insert(&mut self, key: K) -> Position {
        let (position, _) = self.tree.insert_with(key, Duplicates::default);
        self.len += 1;
        position
    }

    /// The number of occurrences of `key`.
    pub fn count(&self, key: &K) -> usize {
        self.tree
            .search(key)
            .and_then(|id| self.tree.payload(id))
            .map_or(0, |payload| payload.slots())
    }

    /// The position of the first occurrence of `key`, or the end position.
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// Returns `true` if at least one occurrence of `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.tree.search(key).is_some()
    }

    /// The position of the first occurrence whose key is not less than
    /// `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        Position::first_slot_of(self.tree.lower_bound(key))
    }

    /// The position of the first occurrence whose key is greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        Position::first_slot_of(self.tree.upper_bound(key))
    }

    /// The half-open range of positions holding `key`.
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Iterates every occurrence of `key`.
    pub fn equal_range_iter(&self, key: &K) -> Iter<'_, K, Duplicates<K>> {
        let (from, to) = self.equal_range(key);
        self.range(from, to)
    }

    /// Removes every occurrence of `key` and returns how many there were.
    pub fn remove_all(&mut self, key: &K) -> usize {
        let Some((_, duplicates)) = self.tree.remove(key) else {
            return 0;
        };
        let removed = duplicates.slots();
        self.len -= removed;
        removed
    }

    /// Moves every occurrence of `other` into this multiset, leaving `other`
    /// empty.
    pub fn merge(&mut self, other: &mut Self) {
        while let Some(id) = other.tree.first() {
            let Some(removed) = other.tree.remove_node(id) else {
                break;
            };
            trace!("merge moved {} occurrences", removed.payload.slots());

            self.insert(removed.key);
            for key in removed.payload.into_vec() {
                self.insert(key);
            }
        }
        other.len = 0;
    }
}

impl<K> OrderedMultiset<K>
where
    K: Ord + Debug,
{
    /// Checks the red-black invariants, that each key owns a single node,
    /// and that the occurrence count matches. Returns the black height.
    pub fn validate(&self) -> Result<usize, DialogCollectionsError> {
        let height = self.tree.validate_unique()?;

        let mut occurrences = 0;
        let mut current = self.tree.first();
        while let Some(id) = current {
            let (Some(key), Some(payload)) = (self.tree.key(id), self.tree.payload(id)) else {
                break;
            };
            if let Some(stray) = payload.as_slice().iter().find(|other| *other != key) {
                return Err(DialogCollectionsError::Invariant(format!(
                    "node {id} with key {key:?} holds occurrence {stray:?}"
                )));
            }
            occurrences += payload.slots();
            current = self.tree.next_node(id);
        }

        if occurrences != self.len {
            return Err(DialogCollectionsError::Invariant(format!(
                "multiset counts {} occurrences but holds {occurrences}",
                self.len
            )));
        }
        Ok(height)
    }
}

impl<K> Debug for OrderedMultiset<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> PartialEq for OrderedMultiset<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K> Eq for OrderedMultiset<K> where K: Eq {}

impl<K> FromIterator<K> for OrderedMultiset<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<K> Extend<K> for OrderedMultiset<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, const N: usize> From<[K; N]> for OrderedMultiset<K>
where
    K: Ord,
{
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a OrderedMultiset<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, Duplicates<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
