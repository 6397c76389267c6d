use thiserror::Error;

/// Errors that can occur when addressing a [`WeakList`] by index
///
/// Neither variant is a fault: a hole is the normal result of the host
/// destroying an entity after it was queued. Callers log and skip.
///
/// [`WeakList`]: crate::WeakList
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeakListError {
    /// Index is past the end of the list
    #[error("Index {index} out of bounds for WeakList of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The slot exists but its referent has been destroyed by its owner
    #[error("WeakList slot {index} refers to an entity that no longer exists")]
    DeadReference { index: usize },
}
