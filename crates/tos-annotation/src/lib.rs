//! Tree of Science star annotations
//!
//! Keeps the per-article stars of a shared tree document consistent across
//! every viewer of that tree.
//!
//! # Core Concepts
//!
//! - [`TreeDocument`]: the shared remote document; only its `stars` field is
//!   interpreted here
//! - [`DocumentStore`]: point reads, whole-document writes, live
//!   subscriptions
//! - [`AnnotationSyncEngine`]: subscription-driven projection plus the
//!   read-modify-write toggle
//! - [`MemoryDocumentStore`]: in-process store for tests and tooling
//!
//! # Architecture
//!
//! ```text
//! render layer ──toggle_star──► AnnotationSyncEngine ──get/set──► DocumentStore
//!       ▲                              │  ▲                            │
//!       └──────── watch(StarMap) ──────┘  └──────── Subscription ──────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tos_annotation::{AnnotationSyncEngine, DocumentPath, MemoryDocumentStore, TreeDocument};
//! use tos_content::StarKey;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let path = DocumentPath::new("trees/demo")?;
//! let store = Arc::new(MemoryDocumentStore::with_document(path.clone(), TreeDocument::new()));
//!
//! let engine = AnnotationSyncEngine::mount(store, path).await?;
//! let starred = engine.toggle_star(&StarKey::encode("Smith J, 2001")).await?;
//! assert!(starred);
//!
//! engine.unmount().await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod document;
mod engine;
mod error;
mod memory;
mod store;

pub use document::{DocumentPath, StarMap, TreeDocument, STARS_FIELD};
pub use engine::{AnnotationSyncEngine, SyncStatus};
pub use error::{PathError, StoreError, SyncError};
pub use memory::MemoryDocumentStore;
pub use store::{DocumentStore, Snapshot, Subscription, SubscriptionGuard};

pub use tos_content::StarKey;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
