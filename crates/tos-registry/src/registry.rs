//! File registry
//!
//! Owns the authoritative, ordered set of registered files. Every structural
//! change (add, remove, swap) recomputes the cap flags for the whole
//! sequence, and every change other than progress bumps a revision counter
//! that downstream views watch.
//!
//! No operation fails for an unknown identity: uploads, removals and
//! reorders race each other by nature, so a stale identity is a no-op.

use crate::capping::CappingPolicy;
use crate::progress::ProgressTracker;
use crate::record::{FileRecord, ParsedContent};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tos_content::ContentHash;

/// Outcome of [`FileRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new entry was appended
    Added(ContentHash),
    /// Identical content was already registered; nothing changed
    AlreadyRegistered(ContentHash),
}

impl Registration {
    #[inline]
    #[must_use]
    pub fn identity(&self) -> ContentHash {
        match self {
            Self::Added(id) | Self::AlreadyRegistered(id) => *id,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Per-file data shown by the upload indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCard {
    pub identity: ContentHash,
    pub name: String,
    pub progress: f64,
    pub articles: usize,
    pub citations: usize,
    pub keywords: Vec<String>,
    pub capped: bool,
    pub size_mib: f64,
}

#[derive(Debug, Default)]
struct Entries {
    files: IndexMap<ContentHash, FileRecord>,
    /// Index-aligned with `files`
    capped: Vec<bool>,
}

/// Registry of uploaded files in registration order
#[derive(Debug)]
pub struct FileRegistry {
    entries: RwLock<Entries>,
    progress: ProgressTracker,
    policy: CappingPolicy,
    revision: watch::Sender<u64>,
}

impl FileRegistry {
    /// Create an empty registry with the given size budget
    #[must_use]
    pub fn new(policy: CappingPolicy) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: RwLock::new(Entries::default()),
            progress: ProgressTracker::new(),
            policy,
            revision,
        }
    }

    /// Register a file
    ///
    /// Identical content is registered once; a second add returns
    /// [`Registration::AlreadyRegistered`] and leaves the registry untouched.
    pub fn add(&self, record: FileRecord) -> Registration {
        let identity = record.identity();
        let mut entries = self.entries.write();
        if entries.files.contains_key(&identity) {
            tracing::debug!(file = %identity.short(), name = record.name(), "duplicate upload ignored");
            return Registration::AlreadyRegistered(identity);
        }

        tracing::debug!(
            file = %identity.short(),
            name = record.name(),
            size = record.size_bytes(),
            "registering file"
        );
        entries.files.insert(identity, record);
        self.progress.start(identity);
        self.recap(&mut entries);
        self.bump();
        Registration::Added(identity)
    }

    /// Remove a file and its progress entry
    ///
    /// Returns the removed record, or `None` if it was not registered.
    pub fn remove(&self, identity: &ContentHash) -> Option<FileRecord> {
        let mut entries = self.entries.write();
        let (_, _, record) = entries.files.shift_remove_full(identity)?;
        self.progress.remove(identity);
        self.recap(&mut entries);
        self.bump();
        tracing::debug!(file = %identity.short(), "removed file");
        Some(record)
    }

    /// Move a file by one slot (the `move` action on a file card)
    ///
    /// The entry trades places with its predecessor; the first entry trades
    /// places with its successor. Returns `false` when nothing moved.
    #[doc(alias = "move")]
    pub fn swap(&self, identity: &ContentHash) -> bool {
        let mut entries = self.entries.write();
        let Some(index) = entries.files.get_index_of(identity) else {
            return false;
        };
        if entries.files.len() < 2 {
            return false;
        }
        let other = if index == 0 { 1 } else { index - 1 };
        entries.files.swap_indices(index, other);
        self.recap(&mut entries);
        self.bump();
        tracing::debug!(file = %identity.short(), from = index, to = other, "moved file");
        true
    }

    /// Record upload progress; unknown identities are ignored
    pub fn track(&self, identity: &ContentHash, value: f64) -> bool {
        self.progress.track(identity, value)
    }

    /// Set the validity flag from the validation collaborator
    pub fn set_valid(&self, identity: &ContentHash, valid: bool) -> bool {
        self.update(identity, |record| record.set_valid(valid))
    }

    /// Attach parse results from the parsing collaborator
    pub fn set_parsed(&self, identity: &ContentHash, parsed: ParsedContent) -> bool {
        self.update(identity, |record| record.set_parsed(parsed))
    }

    fn update(&self, identity: &ContentHash, f: impl FnOnce(&mut FileRecord) -> bool) -> bool {
        let mut entries = self.entries.write();
        let Some(record) = entries.files.get_mut(identity) else {
            return false;
        };
        if f(record) {
            self.bump();
        }
        true
    }

    fn recap(&self, entries: &mut Entries) {
        entries.capped = self.policy.apply(entries.files.values());
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().files.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().files.is_empty()
    }

    #[must_use]
    pub fn contains(&self, identity: &ContentHash) -> bool {
        self.entries.read().files.contains_key(identity)
    }

    #[must_use]
    pub fn get(&self, identity: &ContentHash) -> Option<FileRecord> {
        self.entries.read().files.get(identity).cloned()
    }

    /// Identities in registration order
    #[must_use]
    pub fn identities(&self) -> Vec<ContentHash> {
        self.entries.read().files.keys().copied().collect()
    }

    /// All records in registration order, valid or not
    #[must_use]
    pub fn records(&self) -> Vec<FileRecord> {
        self.entries.read().files.values().cloned().collect()
    }

    #[must_use]
    pub fn progress(&self, identity: &ContentHash) -> Option<f64> {
        self.progress.get(identity)
    }

    #[must_use]
    pub fn is_capped(&self, identity: &ContentHash) -> Option<bool> {
        let entries = self.entries.read();
        let index = entries.files.get_index_of(identity)?;
        entries.capped.get(index).copied()
    }

    /// Cap flags in registration order
    #[must_use]
    pub fn capped(&self) -> Vec<(ContentHash, bool)> {
        let entries = self.entries.read();
        entries
            .files
            .keys()
            .copied()
            .zip(entries.capped.iter().copied())
            .collect()
    }

    /// Valid records in registration order
    #[must_use]
    pub fn valid_files(&self) -> Vec<FileRecord> {
        self.valid_files_at().1
    }

    /// Valid records together with the revision they were read at
    pub(crate) fn valid_files_at(&self) -> (u64, Vec<FileRecord>) {
        let entries = self.entries.read();
        let files = entries
            .files
            .values()
            .filter(|record| record.is_valid())
            .cloned()
            .collect();
        (*self.revision.borrow(), files)
    }

    /// Cards for the valid files, with cap flags from the full sequence
    #[must_use]
    pub fn cards(&self) -> Vec<FileCard> {
        let entries = self.entries.read();
        entries
            .files
            .values()
            .zip(entries.capped.iter().copied())
            .filter(|(record, _)| record.is_valid())
            .map(|(record, capped)| FileCard {
                identity: record.identity(),
                name: record.name().to_string(),
                progress: self.progress.get(&record.identity()).unwrap_or(0.0),
                articles: record.articles().len(),
                citations: record.citations().len(),
                keywords: record.keywords().to_vec(),
                capped,
                size_mib: record.size_mib(),
            })
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> CappingPolicy {
        self.policy
    }

    /// Current revision; bumped on every change except progress
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch revision changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self::new(CappingPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MIB;

    fn mib_file(name: &str, mib: u64, seed: u8) -> FileRecord {
        let blob = vec![seed; usize::try_from(mib * MIB).unwrap()];
        FileRecord::new(name, blob).with_valid(true)
    }

    #[test]
    fn add_twice_registers_once() {
        let registry = FileRegistry::default();
        let first = registry.add(FileRecord::new("a.txt", b"same".to_vec()));
        let second = registry.add(FileRecord::new("b.txt", b"same".to_vec()));

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.identity(), second.identity());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&first.identity()).unwrap().name(), "a.txt");
    }

    #[test]
    fn add_initializes_progress_and_cap() {
        let registry = FileRegistry::default();
        let id = registry.add(FileRecord::new("a", b"a".to_vec())).identity();
        assert_eq!(registry.progress(&id), Some(0.0));
        assert_eq!(registry.is_capped(&id), Some(false));
    }

    #[test]
    fn capping_over_registration_order() {
        let registry = FileRegistry::new(CappingPolicy::new(10 * MIB));
        let a = registry.add(mib_file("a", 4, 1)).identity();
        let b = registry.add(mib_file("b", 4, 2)).identity();
        let c = registry.add(mib_file("c", 4, 3)).identity();

        assert_eq!(registry.capped(), vec![(a, false), (b, false), (c, true)]);
    }

    #[test]
    fn remove_recomputes_later_flags() {
        let registry = FileRegistry::new(CappingPolicy::new(10 * MIB));
        let a = registry.add(mib_file("a", 4, 1)).identity();
        let b = registry.add(mib_file("b", 4, 2)).identity();
        let c = registry.add(mib_file("c", 4, 3)).identity();

        assert!(registry.remove(&a).is_some());
        assert_eq!(registry.capped(), vec![(b, false), (c, false)]);
        assert_eq!(registry.progress(&a), None);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let registry = FileRegistry::default();
        let before = registry.revision();
        assert!(registry.remove(&ContentHash::of(b"ghost")).is_none());
        assert_eq!(registry.revision(), before);
    }

    #[test]
    fn swap_promotes_one_slot() {
        let registry = FileRegistry::default();
        let a = registry.add(FileRecord::new("a", b"a".to_vec())).identity();
        let b = registry.add(FileRecord::new("b", b"b".to_vec())).identity();
        let c = registry.add(FileRecord::new("c", b"c".to_vec())).identity();

        assert!(registry.swap(&c));
        assert_eq!(registry.identities(), vec![a, c, b]);
    }

    #[test]
    fn swap_first_demotes() {
        let registry = FileRegistry::default();
        let a = registry.add(FileRecord::new("a", b"a".to_vec())).identity();
        let b = registry.add(FileRecord::new("b", b"b".to_vec())).identity();

        assert!(registry.swap(&a));
        assert_eq!(registry.identities(), vec![b, a]);
    }

    #[test]
    fn swap_single_or_unknown_is_noop() {
        let registry = FileRegistry::default();
        let a = registry.add(FileRecord::new("a", b"a".to_vec())).identity();
        assert!(!registry.swap(&a));
        assert!(!registry.swap(&ContentHash::of(b"ghost")));
    }

    #[test]
    fn swap_recomputes_all_flags() {
        let registry = FileRegistry::new(CappingPolicy::new(10 * MIB));
        let big = registry.add(mib_file("big", 8, 1)).identity();
        let small = registry.add(mib_file("small", 1, 2)).identity();
        let mid = registry.add(mib_file("mid", 4, 3)).identity();
        assert_eq!(
            registry.capped(),
            vec![(big, false), (small, false), (mid, true)]
        );

        // mid moves ahead of small: 8, 12, 13
        assert!(registry.swap(&mid));
        assert_eq!(
            registry.capped(),
            vec![(big, false), (mid, true), (small, true)]
        );
    }

    #[test]
    fn track_unknown_identity_ignored() {
        let registry = FileRegistry::default();
        assert!(!registry.track(&ContentHash::of(b"ghost"), 0.5));
    }

    #[test]
    fn track_does_not_bump_revision() {
        let registry = FileRegistry::default();
        let id = registry.add(FileRecord::new("a", b"a".to_vec())).identity();
        let before = registry.revision();
        assert!(registry.track(&id, 0.5));
        assert_eq!(registry.revision(), before);
        assert_eq!(registry.progress(&id), Some(0.5));
    }

    #[test]
    fn set_valid_and_parsed() {
        let registry = FileRegistry::default();
        let id = registry.add(FileRecord::new("a", b"a".to_vec())).identity();
        assert!(registry.valid_files().is_empty());

        assert!(registry.set_valid(&id, true));
        assert!(registry.set_parsed(
            &id,
            ParsedContent {
                articles: vec!["A".into(), "B".into()],
                citations: vec!["C".into()],
                keywords: vec!["Trees".into()],
            }
        ));
        let valid = registry.valid_files();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].articles().len(), 2);

        assert!(!registry.set_valid(&ContentHash::of(b"ghost"), true));
    }

    #[test]
    fn unchanged_update_keeps_revision() {
        let registry = FileRegistry::default();
        let id = registry
            .add(FileRecord::new("a", b"a".to_vec()).with_valid(true))
            .identity();
        let before = registry.revision();
        assert!(registry.set_valid(&id, true));
        assert_eq!(registry.revision(), before);
    }

    #[test]
    fn cards_cover_valid_files_only() {
        let registry = FileRegistry::new(CappingPolicy::new(10 * MIB));
        let hidden = registry
            .add(mib_file("hidden", 8, 1).with_valid(false))
            .identity();
        let shown = registry.add(mib_file("shown", 4, 2)).identity();
        registry.track(&shown, 0.75);

        let cards = registry.cards();
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.identity, shown);
        assert_eq!(card.name, "shown");
        assert_eq!(card.progress, 0.75);
        // capped by the invalid file ahead of it
        assert!(card.capped);
        assert!((card.size_mib - 4.0).abs() < f64::EPSILON);
        assert!(registry.contains(&hidden));
    }
}
