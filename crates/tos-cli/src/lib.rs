//! Command implementations behind the `tos` binary
//!
//! Each command takes already-parsed arguments and returns a serializable
//! report; printing is left to `main`.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tos_annotation::{DocumentPath, MemoryDocumentStore, TreeDocument};
use tos_core::{TosConfig, TreeView, TreeViewer};
use tos_registry::{FileCard, FileRecord};
use tos_tree::{summarize, Article, ArticleBand, BandFilter, BandSummary, TreeSections};

/// Document path used for trees edited from local files
pub const LOCAL_TREE: &str = "trees/local";

/// Config file (if any) with the command-line budget applied on top
///
/// # Errors
/// Load or validation failures.
pub async fn resolve_config(path: Option<&Path>, max_size_mib: Option<f64>) -> Result<TosConfig> {
    let mut config = match path {
        Some(path) => TosConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TosConfig::new(),
    };
    if let Some(mib) = max_size_mib {
        config = config.with_max_size_mib(mib);
        config.validate().context("--max-size")?;
    }
    Ok(config)
}

/// Outcome of `tos register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterReport {
    pub budget_bytes: u64,
    pub cards: Vec<FileCard>,
    /// Inputs whose content was already registered under another name
    pub duplicates: Vec<PathBuf>,
    /// Non-empty files are treated as valid; these were not
    pub rejected: Vec<PathBuf>,
}

impl RegisterReport {
    #[must_use]
    pub fn capped(&self) -> usize {
        self.cards.iter().filter(|card| card.capped).count()
    }
}

/// Register files in order and report which ones fit the budget
///
/// # Errors
/// Any input that cannot be read.
pub async fn register(paths: &[PathBuf], config: &TosConfig) -> Result<RegisterReport> {
    let registry = config.registry();
    let mut duplicates = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        let blob = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let valid = !blob.is_empty();

        let registration = registry.add(FileRecord::new(name, blob).with_valid(valid));
        if !registration.is_new() {
            duplicates.push(path.clone());
            continue;
        }
        if !valid {
            rejected.push(path.clone());
        }
        registry.track(&registration.identity(), 1.0);
    }

    tracing::info!(
        files = registry.len(),
        duplicates = duplicates.len(),
        "registered files"
    );
    Ok(RegisterReport {
        budget_bytes: registry.policy().budget_bytes(),
        cards: registry.cards(),
        duplicates,
        rejected,
    })
}

/// Read classifier output from a JSON file
///
/// # Errors
/// I/O or JSON failures.
pub async fn read_sections(path: &Path) -> Result<TreeSections> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading sections {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parsing sections {}", path.display()))
}

/// Read a tree document, or start an empty one if the file does not exist
///
/// # Errors
/// I/O failures other than not-found, or invalid JSON.
pub async fn read_document(path: &Path) -> Result<TreeDocument> {
    match tokio::fs::read_to_string(path).await {
        Ok(source) => serde_json::from_str(&source)
            .with_context(|| format!("parsing tree document {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(TreeDocument::new()),
        Err(err) => Err(err).with_context(|| format!("reading tree document {}", path.display())),
    }
}

/// Band summaries for `tos keywords`
#[must_use]
pub fn keywords(sections: &TreeSections, only: Option<ArticleBand>, config: &TosConfig) -> Vec<BandSummary> {
    summarize(sections, filter_for(only), config.top_keywords)
}

/// Toggle `stars` on `document` and render the tree
///
/// Returns the view and the document as written back by the toggles.
///
/// # Errors
/// Sync failures.
pub async fn tree(
    sections: TreeSections,
    document: TreeDocument,
    stars: &[String],
    only: Option<ArticleBand>,
    config: &TosConfig,
) -> Result<(TreeView, TreeDocument)> {
    let path = DocumentPath::new(LOCAL_TREE)?;
    let store = Arc::new(MemoryDocumentStore::with_document(path.clone(), document));

    let mut viewer = TreeViewer::open(Arc::clone(&store), path.clone(), sections, config).await?;
    if let Some(band) = only {
        viewer.toggle_band(band);
    }
    for label in stars {
        let starred = viewer
            .toggle_star(&Article::new(label.as_str()))
            .await
            .with_context(|| format!("toggling star on '{label}'"))?;
        tracing::info!(%label, starred, "toggled star");
    }

    let view = viewer.render();
    viewer.close().await;
    let document = store.peek(&path).unwrap_or_default();
    Ok((view, document))
}

fn filter_for(only: Option<ArticleBand>) -> BandFilter {
    let mut filter = BandFilter::new();
    if let Some(band) = only {
        filter.toggle(band);
    }
    filter
}
