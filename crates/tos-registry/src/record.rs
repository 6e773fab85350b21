//! Registered file records
//!
//! A [`FileRecord`] is created when an upload starts. Its identity is fixed
//! at construction from the blob bytes; validation and parsing collaborators
//! fill in the rest later.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tos_content::ContentHash;

/// Bytes per mebibyte, the unit of the size budget
pub const MIB: u64 = 1 << 20;

/// Reference to an article found in an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleRef(pub String);

impl ArticleRef {
    /// Create reference from label
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Article label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArticleRef {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Output of the external parsing step for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedContent {
    /// Articles found in the file
    pub articles: Vec<ArticleRef>,
    /// Citations found in the file
    pub citations: Vec<ArticleRef>,
    /// Keywords found in the file
    pub keywords: Vec<String>,
}

/// One uploaded file
///
/// # Invariants
/// - `identity` is always `ContentHash::of(blob)`
/// - `size_bytes` is always `blob.len()`
#[derive(Clone, PartialEq)]
pub struct FileRecord {
    identity: ContentHash,
    name: String,
    blob: Arc<[u8]>,
    size_bytes: u64,
    valid: bool,
    parsed: ParsedContent,
}

impl FileRecord {
    /// Create a record, hashing the blob
    ///
    /// New records start invalid and unparsed.
    #[must_use]
    pub fn new(name: impl Into<String>, blob: impl Into<Arc<[u8]>>) -> Self {
        let blob = blob.into();
        Self {
            identity: ContentHash::of(&blob),
            name: name.into(),
            size_bytes: blob.len() as u64,
            blob,
            valid: false,
            parsed: ParsedContent::default(),
        }
    }

    /// Mark validity up front (builder form)
    #[inline]
    #[must_use]
    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Attach parse results up front (builder form)
    #[inline]
    #[must_use]
    pub fn with_parsed(mut self, parsed: ParsedContent) -> Self {
        self.parsed = parsed;
        self
    }

    #[inline]
    #[must_use]
    pub fn identity(&self) -> ContentHash {
        self.identity
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Size in mebibytes, as shown on file cards
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / MIB as f64
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    #[must_use]
    pub fn articles(&self) -> &[ArticleRef] {
        &self.parsed.articles
    }

    #[inline]
    #[must_use]
    pub fn citations(&self) -> &[ArticleRef] {
        &self.parsed.citations
    }

    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.parsed.keywords
    }

    pub(crate) fn set_valid(&mut self, valid: bool) -> bool {
        let changed = self.valid != valid;
        self.valid = valid;
        changed
    }

    pub(crate) fn set_parsed(&mut self, parsed: ParsedContent) -> bool {
        let changed = self.parsed != parsed;
        self.parsed = parsed;
        changed
    }
}

// Blobs can be megabytes; keep them out of debug output.
impl fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRecord")
            .field("identity", &self.identity.short())
            .field("name", &self.name)
            .field("size_bytes", &self.size_bytes)
            .field("valid", &self.valid)
            .field("articles", &self.parsed.articles.len())
            .field("citations", &self.parsed.citations.len())
            .field("keywords", &self.parsed.keywords)
            .finish()
    }
}
