#![deny(missing_docs)]

//! Ordered in-memory collections built on a single red-black tree engine.
//!
//! This crate provides three containers that keep their contents sorted by
//! key and guarantee logarithmic search, insertion and removal:
//!
//! - [`OrderedSet`]: unique keys
//! - [`OrderedMap`]: unique keys, each mapped to a value
//! - [`OrderedMultiset`]: repeated keys, every occurrence kept
//!
//! All three are thin policy layers over [`RbTree`], which owns its nodes in
//! an arena and links them by [`NodeId`]. What a node carries next to its
//! key, and what happens when an equal key is inserted, is decided by the
//! node's [`Payload`].
//!
//! Elements are addressed by [`Position`]: a small detached value that can
//! be stepped forward and backward, handed to `erase`, and used as the bounds
//! of a range. Stepping forward from the last element reaches the end
//! position, and stepping forward from there wraps around to the first
//! element.
//!
//! ```
//! use dialog_collections::{OrderedMap, OrderedMultiset, OrderedSet};
//!
//! let mut set = OrderedSet::from([14, 4, 18, 3, 8, 21, 6, 11, 5, 1]);
//! set.remove(&8);
//! set.remove(&5);
//! assert_eq!(
//!     set.iter().copied().collect::<Vec<_>>(),
//!     vec![1, 3, 4, 6, 11, 14, 18, 21]
//! );
//!
//! let mut map = OrderedMap::new();
//! map.insert("b", 2);
//! map.insert("a", 1);
//! assert_eq!(map.first(), Some((&"a", &1)));
//!
//! let bag = OrderedMultiset::from([2, 1, 2]);
//! assert_eq!(bag.count(&2), 2);
//! ```
//!
//! Every container can check its own structure, which is what the test
//! suites lean on:
//!
//! ```
//! # use dialog_collections::OrderedSet;
//! let set: OrderedSet<u32> = (0..1000).collect();
//! assert!(set.validate().is_ok());
//! ```

mod error;
pub use error::*;

mod node;
pub use node::*;

mod payload;
pub use payload::*;

mod tree;
pub use tree::*;

mod cursor;
pub use cursor::*;

mod validate;

mod render;

mod set;
pub use set::*;

mod map;
pub use map::*;

mod multiset;
pub use multiset::*;
