//! Tree of Science core
//!
//! Ties the upload registry and the star annotations to a configuration and
//! turns an open tree into something a front end can draw.
//!
//! - [`TosConfig`]: upload budget and keywords per band, loaded from TOML
//! - [`TreeViewer`]: classified sections plus live stars, rendered into a
//!   [`TreeView`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tos_annotation::{DocumentPath, MemoryDocumentStore, TreeDocument};
//! use tos_core::{TosConfig, TreeViewer};
//! use tos_tree::{Article, TreeSections};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TosConfig::from_toml_str("top_keywords = 3")?;
//! let path = DocumentPath::new("trees/graphene")?;
//! let store = Arc::new(MemoryDocumentStore::with_document(path.clone(), TreeDocument::new()));
//!
//! let sections = TreeSections {
//!     root: vec![Article::new("Novoselov K, 2004").with_keywords(["Graphene"])],
//!     ..TreeSections::default()
//! };
//! let viewer = TreeViewer::open(store, path, sections, &config).await?;
//! viewer.toggle_star(&viewer.sections().root[0].clone()).await?;
//!
//! let view = viewer.render();
//! println!("{} bands", view.bands.len());
//! viewer.close().await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod viewer;

pub use config::{TosConfig, DEFAULT_MAX_SIZE_MIB};
pub use error::{ConfigError, CoreError};
pub use viewer::{ArticleView, BandView, TreeView, TreeViewer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
