/// The shape of the data a container keeps alongside each key, and the
/// policy it applies when a key is inserted twice.
///
/// Every node of an [`RbTree`](crate::RbTree) holds one key and one payload.
/// A payload exposes one or more _slots_, each of which is a single element
/// as seen by iteration. Unique-key containers hold exactly one slot per
/// node and reject duplicates; the multiset groups every occurrence of a key
/// into the slots of a single node.
pub trait Payload<K> {
    /// The element yielded when iterating over a slot.
    type Item<'a>
    where
        Self: 'a,
        K: 'a;

    /// The number of elements held by the node.
    fn slots(&self) -> usize;

    /// Projects a slot of a node into an iteration item.
    fn item<'a>(key: &'a K, payload: &'a Self, slot: usize) -> Option<Self::Item<'a>>;

    /// Called when `key` is inserted and a node with an equal key already
    /// exists. Returns the slot the key now occupies, or hands the key back
    /// if the container keeps keys unique.
    fn absorb(&mut self, key: K) -> Result<usize, K> {
        Err(key)
    }

    /// Removes a single slot from a node.
    fn release(key: &mut K, payload: &mut Self, slot: usize) -> Release<K>;
}

/// The outcome of [`Payload::release`].
#[derive(Debug, PartialEq, Eq)]
pub enum Release<K> {
    /// The slot was removed and the node still holds other slots.
    Slot(K),
    /// The slot was the last one; the whole node must leave the tree.
    Node,
}

impl<K> Payload<K> for () {
    type Item<'a>
        = &'a K
    where
        Self: 'a,
        K: 'a;

    fn slots(&self) -> usize {
        1
    }

    fn item<'a>(key: &'a K, _payload: &'a Self, slot: usize) -> Option<Self::Item<'a>> {
        (slot == 0).then_some(key)
    }

    fn release(_key: &mut K, _payload: &mut Self, _slot: usize) -> Release<K> {
        Release::Node
    }
}

/// The payload of an [`OrderedMap`](crate::OrderedMap) node: the value
/// mapped to the node's key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapped<V>(pub V);

impl<K, V> Payload<K> for Mapped<V> {
    type Item<'a>
        = (&'a K, &'a V)
    where
        Self: 'a,
        K: 'a;

    fn slots(&self) -> usize {
        1
    }

    fn item<'a>(key: &'a K, payload: &'a Self, slot: usize) -> Option<Self::Item<'a>> {
        (slot == 0).then_some((key, &payload.0))
    }

    fn release(_key: &mut K, _payload: &mut Self, _slot: usize) -> Release<K> {
        Release::Node
    }
}

/// The payload of an [`OrderedMultiset`](crate::OrderedMultiset) node.
///
/// Slot 0 is the node key itself. Every further occurrence of an equal key
/// is appended here, so slot `n` lives at index `n - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Duplicates<K>(pub(crate) Vec<K>);

impl<K> Default for Duplicates<K> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<K> Duplicates<K> {
    /// The occurrences stored after the node key, in insertion order.
    pub fn as_slice(&self) -> &[K] {
        &self.0
    }

    pub(crate) fn into_vec(self) -> Vec<K> {
        self.0
    }
}

impl<K> Payload<K> for Duplicates<K> {
    type Item<'a>
        = &'a K
    where
        Self: 'a,
        K: 'a;

    fn slots(&self) -> usize {
        self.0.len() + 1
    }

    fn item<'a>(key: &'a K, payload: &'a Self, slot: usize) -> Option<Self::Item<'a>> {
        match slot {
            0 => Some(key),
            slot => payload.0.get(slot - 1),
        }
    }

    fn absorb(&mut self, key: K) -> Result<usize, K> {
        self.0.push(key);
        Ok(self.0.len())
    }

    fn release(key: &mut K, payload: &mut Self, slot: usize) -> Release<K> {
        if payload.0.is_empty() {
            return Release::Node;
        }

        let released = if slot == 0 {
            // The promoted occurrence compares equal, so the node stays in
            // order.
            std::mem::replace(key, payload.0.remove(0))
        } else {
            payload.0.remove(slot - 1)
        };

        if payload.0.capacity() > 4 * payload.0.len().max(1) {
            payload.0.shrink_to_fit();
        }

        Release::Slot(released)
    }
}
