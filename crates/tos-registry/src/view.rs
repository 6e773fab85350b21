//! Valid-files view
//!
//! The render layer only sees files marked valid. [`ValidFilesView`] keeps
//! that filtered list and recomputes it on demand; when the recomputed list
//! is structurally equal to the held one, the held `Arc` is kept so
//! downstream consumers can skip work with a pointer comparison.

use crate::record::FileRecord;
use crate::registry::FileRegistry;
use std::sync::Arc;

/// Filtered, structurally-stable list of valid files
#[derive(Debug, Clone, Default)]
pub struct ValidFilesView {
    revision: Option<u64>,
    files: Arc<Vec<FileRecord>>,
}

impl ValidFilesView {
    /// Empty view that has never been refreshed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View populated from `registry`
    #[must_use]
    pub fn from_registry(registry: &FileRegistry) -> Self {
        let mut view = Self::new();
        view.refresh(registry);
        view
    }

    /// Recompute from `registry`
    ///
    /// Returns `true` only when the filtered content changed. An unchanged
    /// registry revision skips the filter entirely.
    pub fn refresh(&mut self, registry: &FileRegistry) -> bool {
        if self.revision == Some(registry.revision()) {
            return false;
        }

        let (revision, fresh) = registry.valid_files_at();
        self.revision = Some(revision);
        if *self.files == fresh {
            return false;
        }

        tracing::trace!(count = fresh.len(), revision, "valid files changed");
        self.files = Arc::new(fresh);
        true
    }

    /// Shared handle to the current list
    #[inline]
    #[must_use]
    pub fn files(&self) -> Arc<Vec<FileRecord>> {
        Arc::clone(&self.files)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[FileRecord] {
        &self.files
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
