//! Store-safe annotation keys
//!
//! Article labels contain characters the document store will not accept
//! in map keys (dots, brackets), so every label is base64-encoded before it
//! is used as a key in a tree document's `stars` map.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::{self, Display, Formatter};

/// An encoded article label, usable as a `stars` map key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StarKey(String);

impl StarKey {
    /// Encode a raw article label
    ///
    /// Deterministic: the same label always produces the same key.
    #[must_use]
    pub fn encode(label: &str) -> Self {
        Self(STANDARD.encode(label.as_bytes()))
    }

    /// Wrap a key that is already encoded
    ///
    /// # Errors
    /// Returns error if `encoded` is not valid standard base64
    pub fn from_encoded(encoded: impl Into<String>) -> Result<Self, KeyError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(KeyError::Empty);
        }
        STANDARD.decode(encoded.as_bytes())?;
        Ok(Self(encoded))
    }

    /// The encoded form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StarKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StarKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<StarKey> for String {
    fn from(key: StarKey) -> Self {
        key.0
    }
}

/// Errors from wrapping pre-encoded keys
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Key was empty
    #[error("star key must not be empty")]
    Empty,

    /// Key was not valid base64
    #[error("star key is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
