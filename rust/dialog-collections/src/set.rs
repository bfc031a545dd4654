use std::fmt::Debug;

use tracing::trace;

use crate::{Cursor, DialogCollectionsError, Iter, Position, RbTree, Taken};

/// An ordered set of unique keys backed by a red-black tree.
///
/// Inserting a key that is already present leaves the set unchanged and
/// reports the existing element.
///
/// ```
/// use dialog_collections::OrderedSet;
///
/// let mut set = OrderedSet::from([14, 4, 18, 3, 8]);
/// let (_, inserted) = set.insert(4);
/// assert!(!inserted);
///
/// set.remove(&8);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 4, 14, 18]);
/// ```
#[derive(Clone)]
pub struct OrderedSet<K> {
    tree: RbTree<K, ()>,
    len: usize,
}

impl<K> Default for OrderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OrderedSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
            len: 0,
        }
    }

    /// The number of keys in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The largest number of keys a set of this type could hold.
    pub fn max_size(&self) -> usize {
        RbTree::<K, ()>::max_nodes()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Exchanges the contents of two sets.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// The underlying tree.
    pub fn tree(&self) -> &RbTree<K, ()> {
        &self.tree
    }

    /// Iterates the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K, ()> {
        self.tree.iter().counted(self.len)
    }

    /// Iterates the keys in `[from, to)`.
    pub fn range(&self, from: Position, to: Position) -> Iter<'_, K, ()> {
        self.tree.range(from, to)
    }

    /// The position of the smallest key.
    pub fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// The end position.
    pub fn end(&self) -> Position {
        self.tree.end()
    }

    /// The position after `position`.
    pub fn next(&self, position: Position) -> Position {
        self.tree.next_position(position)
    }

    /// The position before `position`.
    pub fn prev(&self, position: Position) -> Position {
        self.tree.prev_position(position)
    }

    /// The key at `position`.
    pub fn get(&self, position: Position) -> Option<&K> {
        self.tree.item(position)
    }

    /// A cursor starting at `position`.
    pub fn cursor(&self, position: Position) -> Cursor<'_, K, ()> {
        self.tree.cursor(position)
    }

    /// The smallest key.
    pub fn first(&self) -> Option<&K> {
        self.tree.first().and_then(|id| self.tree.key(id))
    }

    /// The largest key.
    pub fn last(&self) -> Option<&K> {
        self.tree.last().and_then(|id| self.tree.key(id))
    }

    /// Removes the key at `position` and returns the position of the key
    /// that followed it. Erasing the end position does nothing.
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

impl<K> OrderedSet<K>
where
    K: Ord,
{
    /// Inserts `key`, returning its position and whether it was newly
    /// added.
    pub fn insert(&mut self, key: K) -> (Position, bool) {
        let (position, inserted) = self.tree.insert_with(key, || ());
        if inserted {
            self.len += 1;
        }
        (position, inserted)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let position = self.find(key);
        if position.is_end() {
            return false;
        }
        self.erase(position);
        true
    }

    /// The position of `key`, or the end position.
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// Returns `true` if `key` is in the set.
    pub fn contains(&self, key: &K) -> bool {
        self.tree.search(key).is_some()
    }

    /// The position of the first key not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        Position::first_slot_of(self.tree.lower_bound(key))
    }

    /// The position of the first key greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        Position::first_slot_of(self.tree.upper_bound(key))
    }

    /// The next greater key after `key`, if `key` is present.
    pub fn successor(&self, key: &K) -> Option<&K> {
        self.tree.successor(key).and_then(|id| self.tree.key(id))
    }

    /// The next smaller key before `key`, if `key` is present.
    pub fn predecessor(&self, key: &K) -> Option<&K> {
        self.tree.predecessor(key).and_then(|id| self.tree.key(id))
    }

    /// Moves every key of `other` that is not already present into this set.
    /// Keys present in both stay in `other`.
    ///
    /// `other` is walked in key order, so the outcome depends only on the
    /// keys involved and not on how either tree is shaped.
    pub fn merge(&mut self, other: &mut Self) {
        let mut position = other.begin();

        while let Some(id) = position.node() {
            let Some(key) = other.tree.key(id) else {
                break;
            };

            if self.contains(key) {
                position = other.next(position);
                continue;
            }

            let Some((taken, next)) = other.tree.take(position) else {
                break;
            };
            other.len -= 1;
            if let Taken::Node(key, ()) = taken {
                trace!("merge moved a key");
                self.insert(key);
            }
            position = next;
        }
    }
}

impl<K> OrderedSet<K>
where
    K: Ord + Debug,
{
    /// Checks the red-black invariants, key uniqueness, and the element
    /// count. Returns the black height.
    pub fn validate(&self) -> Result<usize, DialogCollectionsError> {
        let height = self.tree.validate_unique()?;
        if self.tree.node_count() != self.len {
            return Err(DialogCollectionsError::Invariant(format!(
                "set counts {} keys but holds {} nodes",
                self.len,
                self.tree.node_count()
            )));
        }
        Ok(height)
    }
}

impl<K> Debug for OrderedSet<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> PartialEq for OrderedSet<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K> Eq for OrderedSet<K> where K: Eq {}

impl<K> FromIterator<K> for OrderedSet<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K> Extend<K> for OrderedSet<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, const N: usize> From<[K; N]> for OrderedSet<K>
where
    K: Ord,
{
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a OrderedSet<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
