//! Error types for the annotation layer
//!
//! - [`PathError`]: malformed document paths
//! - [`StoreError`]: failures reported by a document store
//! - [`SyncError`]: failures of the sync engine, including the fatal
//!   [`SyncError::NotFound`] when a tree document has vanished

use crate::document::DocumentPath;

/// Malformed document path
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    /// Path was empty
    #[error("document path must not be empty")]
    Empty,

    /// Path had an empty segment (`a//b`, leading or trailing `/`)
    #[error("document path has an empty segment: '{0}'")]
    EmptySegment(String),
}

/// Errors reported by a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store shut down
    #[error("store closed")]
    Closed,
}

/// Errors from [`AnnotationSyncEngine`](crate::AnnotationSyncEngine)
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Tree document does not exist; the toggle was abandoned without a write
    #[error("unable to get tree data from path: {path}")]
    NotFound { path: DocumentPath },

    /// Subscription ended before delivering the initial snapshot
    #[error("subscription to {path} closed before the first snapshot")]
    SubscriptionClosed { path: DocumentPath },

    /// Underlying store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Whether the tree document was missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let path = DocumentPath::new("trees/abc").unwrap();
        let err = SyncError::NotFound { path };
        assert_eq!(err.to_string(), "unable to get tree data from path: trees/abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn store_errors_convert() {
        let err: SyncError = StoreError::Closed.into();
        assert!(matches!(err, SyncError::Store(StoreError::Closed)));
        assert!(!err.is_not_found());
    }
}
