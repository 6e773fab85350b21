//! Upload progress per file identity

use dashmap::DashMap;
use tos_content::ContentHash;

/// Fractional upload completion per registered identity
///
/// Entries exist only between [`ProgressTracker::start`] and
/// [`ProgressTracker::remove`]. Reports for identities without an entry are
/// dropped, so an uploader racing a removal cannot resurrect a file.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: DashMap<ContentHash, f64>,
}

impl ProgressTracker {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an entry at zero
    pub fn start(&self, identity: ContentHash) {
        self.entries.insert(identity, 0.0);
    }

    /// Store the latest report for `identity`
    ///
    /// Values are clamped to `[0, 1]`. Returns `false` when the identity has
    /// no entry or the value is NaN; nothing is stored in either case.
    pub fn track(&self, identity: &ContentHash, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        match self.entries.get_mut(identity) {
            Some(mut entry) => {
                *entry = value.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, identity: &ContentHash) -> Option<f64> {
        self.entries.get(identity).map(|entry| *entry)
    }

    /// Drop the entry for `identity`
    pub fn remove(&self, identity: &ContentHash) -> Option<f64> {
        self.entries.remove(identity).map(|(_, value)| value)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
