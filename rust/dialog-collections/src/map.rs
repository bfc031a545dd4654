use std::{fmt::Debug, ops::Index};

use tracing::trace;

use crate::{Cursor, DialogCollectionsError, Iter, Mapped, Position, RbTree, Taken};

/// An ordered map from unique keys to values, backed by a red-black tree.
///
/// Iteration yields `(&K, &V)` pairs in ascending key order.
///
/// ```
/// use dialog_collections::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert(30, "q");
/// map.insert(10, "s");
/// map.insert_or_assign(30, "z");
///
/// assert_eq!(map.at(&30), Ok(&"z"));
/// assert!(map.at(&99).is_err());
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![10, 30]);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    tree: RbTree<K, Mapped<V>>,
    len: usize,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
            len: 0,
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The largest number of entries a map of this type could hold.
    pub fn max_size(&self) -> usize {
        RbTree::<K, Mapped<V>>::max_nodes()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Exchanges the contents of two maps.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// The underlying tree.
    pub fn tree(&self) -> &RbTree<K, Mapped<V>> {
        &self.tree
    }

    /// Iterates the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, Mapped<V>> {
        self.tree.iter().counted(self.len)
    }

    /// Iterates the entries in `[from, to)`.
    pub fn range(&self, from: Position, to: Position) -> Iter<'_, K, Mapped<V>> {
        self.tree.range(from, to)
    }

    /// Iterates the keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates the values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// The position of the entry with the smallest key.
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

    /// The entry at `position`.
    pub fn entry_at(&self, position: Position) -> Option<(&K, &V)> {
        self.tree.item(position)
    }

    /// The value at `position`, mutably.
    pub fn value_at_mut(&mut self, position: Position) -> Option<&mut V> {
        if position.slot() != 0 {
            return None;
        }
        self.tree
            .payload_mut(position.node()?)
            .map(|mapped| &mut mapped.0)
    }

    /// A cursor starting at `position`.
    pub fn cursor(&self, position: Position) -> Cursor<'_, K, Mapped<V>> {
        self.tree.cursor(position)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(self.begin())
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entry_at(self.prev(self.end()))
    }

    /// Removes the entry at `position` and returns the position of the entry
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

impl<K, V> OrderedMap<K, V>
where
    K: Ord,
{
    /// Inserts `key` mapped to `value` unless the key is already present,
    /// in which case the map is left unchanged and `value` is dropped.
    /// Returns the position of the entry and whether it was newly added.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let (position, inserted) = self.tree.insert_with(key, || Mapped(value));
        if inserted {
            self.len += 1;
        }
        (position, inserted)
    }

    /// Inserts `key` mapped to `value`, overwriting the value in place when
    /// the key is already present.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        if let Some(id) = self.tree.search(&key) {
            self.tree.live_payload_mut(id).0 = value;
            return (Position::at(id, 0), false);
        }
        self.insert(key, value)
    }

    /// The value mapped to `key`, inserting `V::default()` first if the key
    /// is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let id = match self.tree.search(&key) {
            Some(id) => id,
            None => {
                self.len += 1;
                self.tree.insert_node(key, Mapped::default())
            }
        };
        &mut self.tree.live_payload_mut(id).0
    }

    /// The value mapped to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.tree.search(key)?;
        self.tree.payload(id).map(|mapped| &mapped.0)
    }

    /// The value mapped to `key`, mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.tree.search(key)?;
        self.tree.payload_mut(id).map(|mapped| &mut mapped.0)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (_, Mapped(value)) = self.tree.remove(key)?;
        self.len -= 1;
        Some(value)
    }

    /// The position of `key`, or the end position.
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// Returns `true` if `key` is in the map.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.search(key).is_some()
    }

    /// The position of the first entry whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        Position::first_slot_of(self.tree.lower_bound(key))
    }

    /// The position of the first entry whose key is greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        Position::first_slot_of(self.tree.upper_bound(key))
    }

    /// Moves every entry of `other` whose key is absent here into this map.
    /// Entries with colliding keys stay in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        let mut position = other.begin();

        while let Some(id) = position.node() {
            let Some(key) = other.tree.key(id) else {
                break;
            };

            if self.contains_key(key) {
                position = other.next(position);
                continue;
            }

            let Some((taken, next)) = other.tree.take(position) else {
                break;
            };
            other.len -= 1;
            if let Taken::Node(key, Mapped(value)) = taken {
                trace!("merge moved an entry");
                self.insert(key, value);
            }
            position = next;
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Ord + Debug,
{
    /// The value mapped to `key`, or [`DialogCollectionsError::KeyNotFound`].
    /// Never inserts.
    pub fn at(&self, key: &K) -> Result<&V, DialogCollectionsError> {
        self.get(key)
            .ok_or_else(|| DialogCollectionsError::key_not_found(key))
    }

    /// The value mapped to `key` mutably, or
    /// [`DialogCollectionsError::KeyNotFound`]. Never inserts.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, DialogCollectionsError> {
        let id = self
            .tree
            .search(key)
            .ok_or_else(|| DialogCollectionsError::key_not_found(key))?;
        Ok(&mut self.tree.live_payload_mut(id).0)
    }

    /// Checks the red-black invariants, key uniqueness, and the entry count.
    /// Returns the black height.
    pub fn validate(&self) -> Result<usize, DialogCollectionsError> {
        let height = self.tree.validate_unique()?;
        if self.tree.node_count() != self.len {
            return Err(DialogCollectionsError::Invariant(format!(
                "map counts {} entries but holds {} nodes",
                self.len,
                self.tree.node_count()
            )));
        }
        Ok(height)
    }
}

impl<K, V> Index<&K> for OrderedMap<K, V>
where
    K: Ord + Debug,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not in the map.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key {key:?} is not in the map"),
        }
    }
}

impl<K, V> Debug for OrderedMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V> Eq for OrderedMap<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for OrderedMap<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V>
where
    K: Ord,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, Mapped<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
