//! Tree of Science content primitives
//!
//! Identity and key types shared by the upload registry and the
//! annotation engine.
//!
//! # Core Concepts
//!
//! - [`ContentHash`]: 32-byte Blake3 digest of a file's bytes; the
//!   deduplication and lookup key for registered files
//! - [`ContentHasher`]: incremental form for chunked uploads
//! - [`StarKey`]: base64-encoded article label, safe as a document map key
//!
//! # Example
//!
//! ```rust
//! use tos_content::{ContentHash, StarKey};
//!
//! let id = ContentHash::of(b"PT J\nER\n");
//! assert_eq!(id, ContentHash::of(b"PT J\nER\n"));
//!
//! assert_eq!(StarKey::encode("x").as_str(), "eA==");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod hash;
mod key;

pub use hash::{ContentHash, ContentHasher, HashError};
pub use key::{KeyError, StarKey};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
