//! Tree of Science article bands
//!
//! Pure presentation logic over classifier output: band titles, keyword
//! summaries, star ranking and band filtering. Star state comes from the
//! caller, so this crate has no I/O.
//!
//! # Core Concepts
//!
//! - [`ArticleBand`]: root, trunk or leaf
//! - [`TreeSections`]: ordered articles per band
//! - [`most_common`]: case-insensitive keyword counts
//! - [`rank_band`]: starred articles first, stable otherwise
//!
//! # Example
//!
//! ```rust
//! use tos_tree::{band_keywords, rank_band, Article};
//!
//! let articles = vec![
//!     Article::new("Smith J, 2001").with_keywords(["Graphene"]),
//!     Article::new("Doe A, 2010").with_keywords(["graphene", "Optics"]),
//! ];
//! assert_eq!(band_keywords(&articles, 5), vec!["graphene", "optics"]);
//!
//! let ranked = rank_band(&articles, |key| key.as_str() == articles[1].star_key().as_str());
//! assert_eq!(ranked[0].article.label, "Doe A, 2010");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod article;
mod band;
mod keywords;
mod ranking;

pub use article::{Article, TreeSections};
pub use band::{ArticleBand, BandFilter, UnknownBand};
pub use keywords::{band_keywords, most_common, DEFAULT_TOP_KEYWORDS};
pub use ranking::{rank_band, summarize, BandSummary, RankedArticle};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
