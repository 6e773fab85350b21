//! Content identity for uploaded files
//!
//! Provides [`ContentHash`], the 32-byte Blake3 digest that keys every
//! registered file, and [`ContentHasher`] for computing it incrementally
//! while an upload streams in.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte content hash (Blake3) of a file's bytes
///
/// Two uploads with identical bytes always produce the same hash, which is
/// what makes registration idempotent. The file name plays no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Wrap raw digest bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a complete blob
    #[inline]
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self::new(*blake3::hash(data).as_bytes())
    }

    /// Raw digest bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a hash from a byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| HashError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// First 16 hex chars, for log lines and file cards
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ContentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8; 32]> for ContentHash {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Serialized as a lower-case hex string in every format
impl serde::Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ContentHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

/// Incremental hasher for uploads that arrive in chunks
///
/// Feeding the same bytes in any chunking yields the same [`ContentHash`]
/// as [`ContentHash::of`] over the whole blob.
#[derive(Debug, Clone, Default)]
pub struct ContentHasher {
    inner: blake3::Hasher,
    len: u64,
}

impl ContentHasher {
    /// Start an empty hasher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk
    pub fn update(&mut self, chunk: &[u8]) -> &mut Self {
        self.inner.update(chunk);
        self.len += chunk.len() as u64;
        self
    }

    /// Bytes consumed so far
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether nothing has been fed yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finish and produce the identity
    #[must_use]
    pub fn finalize(&self) -> ContentHash {
        ContentHash::new(*self.inner.finalize().as_bytes())
    }
}

/// Errors that can occur when parsing content hashes
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid hash length
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex decoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_share_identity() {
        let a = ContentHash::of(b"@article{x, title={A}}");
        let b = ContentHash::of(b"@article{x, title={A}}");
        assert_eq!(a, b);
    }

    #[test]
    fn different_bytes_differ() {
        assert_ne!(ContentHash::of(b"savedrecs-1"), ContentHash::of(b"savedrecs-2"));
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let result = ContentHash::from_slice(&[0u8; 31]);
        assert!(matches!(
            result,
            Err(HashError::InvalidLength { expected: 32, actual: 31 })
        ));
    }

    #[test]
    fn display_parses_back() {
        let hash = ContentHash::of(b"scopus export");
        let parsed: ContentHash = hash.to_string().parse().unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn short_is_display_prefix() {
        let hash = ContentHash::of(b"test");
        let short = hash.short();
        assert_eq!(short.len(), 16);
        assert!(hash.to_string().starts_with(&short));
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!(matches!(
            "zz".parse::<ContentHash>(),
            Err(HashError::HexDecode(_))
        ));
    }

    #[test]
    fn serde_json_uses_hex_string() {
        let hash = ContentHash::of(b"test");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hash}\""));
        let decoded: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, decoded);
    }

    #[test]
    fn serde_rejects_malformed_hex() {
        assert!(serde_json::from_str::<ContentHash>("\"zz\"").is_err());
        assert!(serde_json::from_str::<ContentHash>("\"abcd\"").is_err());
        assert!(serde_json::from_str::<ContentHash>("[1, 2, 3]").is_err());
    }

    #[test]
    fn chunked_hashing_matches_whole_blob() {
        let blob = b"PT J\nAU Smith, J\nTI On trees\nER\n";
        let mut hasher = ContentHasher::new();
        for chunk in blob.chunks(5) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.len(), blob.len() as u64);
        assert_eq!(hasher.finalize(), ContentHash::of(blob));
    }

    #[test]
    fn empty_hasher() {
        let hasher = ContentHasher::new();
        assert!(hasher.is_empty());
        assert_eq!(hasher.finalize(), ContentHash::of(b""));
    }
}
