//! Tree of Science upload registry
//!
//! Tracks files the user uploads before a tree is built.
//!
//! # Core Concepts
//!
//! - [`FileRegistry`]: ordered, content-addressed set of uploads
//! - [`ProgressTracker`]: latest upload progress per identity
//! - [`CappingPolicy`]: cumulative size budget over registration order
//! - [`ValidFilesView`]: the valid files the render layer sees, stable
//!   under unrelated changes
//!
//! # Example
//!
//! ```rust
//! use tos_registry::{CappingPolicy, FileRecord, FileRegistry, MIB};
//!
//! let registry = FileRegistry::new(CappingPolicy::new(10 * MIB));
//! let first = registry.add(FileRecord::new("savedrecs.txt", b"PT J\nER\n".to_vec()));
//! let again = registry.add(FileRecord::new("copy.txt", b"PT J\nER\n".to_vec()));
//!
//! assert!(first.is_new());
//! assert!(!again.is_new());
//! assert_eq!(registry.len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod capping;
mod progress;
mod record;
mod registry;
mod view;

pub use capping::{capped, CappingPolicy};
pub use progress::ProgressTracker;
pub use record::{ArticleRef, FileRecord, ParsedContent, MIB};
pub use registry::{FileCard, FileRegistry, Registration};
pub use view::ValidFilesView;

pub use tos_content::ContentHash;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
