use thiserror::Error;

/// Errors that can occur when working with ordered collections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogCollectionsError {
    /// A keyed lookup that must not fabricate a value found no entry.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// A structural invariant of the tree does not hold.
    #[error("Tree invariant violated: {0}")]
    Invariant(String),
}

impl DialogCollectionsError {
    pub(crate) fn key_not_found<K>(key: &K) -> Self
    where
        K: std::fmt::Debug,
    {
        DialogCollectionsError::KeyNotFound(format!("{key:?}"))
    }
}
