//! Tree viewer
//!
//! Binds one tree's classified sections to the live star annotations of its
//! document and produces a render model on demand.

use crate::config::TosConfig;
use crate::error::CoreError;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tos_annotation::{AnnotationSyncEngine, DocumentPath, DocumentStore, StarMap, SyncStatus};
use tos_content::StarKey;
use tos_tree::{rank_band, Article, ArticleBand, BandFilter, BandSummary, TreeSections};

/// One article as displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub article: Article,
    pub key: StarKey,
    pub starred: bool,
}

/// One band as displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandView {
    #[serde(flatten)]
    pub summary: BandSummary,
    pub articles: Vec<ArticleView>,
}

/// Everything needed to draw a tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeView {
    pub bands: Vec<BandView>,
}

impl TreeView {
    /// Build the view from a star projection
    #[must_use]
    pub fn build(
        sections: &TreeSections,
        stars: &StarMap,
        filter: BandFilter,
        top_keywords: usize,
    ) -> Self {
        let bands = filter
            .visible()
            .map(|band| {
                let articles = sections.band(band);
                BandView {
                    summary: BandSummary::new(band, articles, top_keywords),
                    articles: rank_band(articles, |key| stars.is_starred(key))
                        .into_iter()
                        .map(|ranked| ArticleView {
                            article: ranked.article.clone(),
                            key: ranked.key,
                            starred: ranked.starred,
                        })
                        .collect(),
                }
            })
            .collect();
        Self { bands }
    }

    #[must_use]
    pub fn band(&self, band: ArticleBand) -> Option<&BandView> {
        self.bands.iter().find(|view| view.summary.band == band)
    }
}

/// An open tree
pub struct TreeViewer<S: DocumentStore + ?Sized> {
    sections: TreeSections,
    engine: AnnotationSyncEngine<S>,
    filter: BandFilter,
    top_keywords: usize,
}

impl<S: DocumentStore + ?Sized> TreeViewer<S> {
    /// Open the tree at `path` and start following its stars
    ///
    /// # Errors
    /// Propagates mount failures from the sync engine.
    pub async fn open(
        store: Arc<S>,
        path: DocumentPath,
        sections: TreeSections,
        config: &TosConfig,
    ) -> Result<Self, CoreError> {
        let engine = AnnotationSyncEngine::mount(store, path).await?;
        tracing::debug!(path = %engine.path(), articles = sections.len(), "opened tree");
        Ok(Self {
            sections,
            engine,
            filter: BandFilter::new(),
            top_keywords: config.top_keywords,
        })
    }

    /// Current render model
    #[must_use]
    pub fn render(&self) -> TreeView {
        TreeView::build(
            &self.sections,
            &self.engine.stars(),
            self.filter,
            self.top_keywords,
        )
    }

    /// Star or unstar an article; returns the new state
    ///
    /// # Errors
    /// See [`AnnotationSyncEngine::toggle_star`].
    pub async fn toggle_star(&self, article: &Article) -> Result<bool, CoreError> {
        Ok(self.engine.toggle_star(&article.star_key()).await?)
    }

    pub fn toggle_band(&mut self, band: ArticleBand) {
        self.filter.toggle(band);
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> BandFilter {
        self.filter
    }

    #[inline]
    #[must_use]
    pub fn sections(&self) -> &TreeSections {
        &self.sections
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.engine.status()
    }

    /// Fires whenever the stars change and the view should be rebuilt
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<StarMap> {
        self.engine.watch()
    }

    /// Close the tree and release its subscription
    pub async fn close(self) {
        self.engine.unmount().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tos_annotation::MemoryDocumentStore;
    use tos_test_utils::{sample_sections, seeded_store, tree_path};

    fn labels(view: &BandView) -> Vec<&str> {
        view.articles.iter().map(|a| a.article.label.as_str()).collect()
    }

    #[test]
    fn build_ranks_and_summarizes() {
        let sections = sample_sections();
        let stars: StarMap = [(StarKey::encode("Geim A, 2007, NAT MATER"), true)]
            .into_iter()
            .collect();

        let view = TreeView::build(&sections, &stars, BandFilter::new(), 5);
        assert_eq!(view.bands.len(), 3);

        let root = view.band(ArticleBand::Root).unwrap();
        assert_eq!(
            labels(root),
            vec!["Geim A, 2007, NAT MATER", "Novoselov K, 2004, SCIENCE"]
        );
        assert_eq!(root.summary.keywords, vec!["graphene", "electric field"]);
        assert_eq!(root.summary.title, "Root");
    }

    #[tokio::test]
    async fn star_moves_article_up_after_snapshot() {
        let store = Arc::new(seeded_store(&[]));
        let viewer = TreeViewer::open(store, tree_path(), sample_sections(), &TosConfig::new())
            .await
            .unwrap();

        let bonaccorso = viewer.sections().trunk[1].clone();
        assert!(viewer.toggle_star(&bonaccorso).await.unwrap());

        let mut changes = viewer.changes();
        changes
            .wait_for(|stars| stars.is_starred(&bonaccorso.star_key()))
            .await
            .unwrap();

        let view = viewer.render();
        let trunk = view.band(ArticleBand::Trunk).unwrap();
        assert_eq!(trunk.articles[0].article.label, bonaccorso.label);
        assert!(trunk.articles[0].starred);
        viewer.close().await;
    }

    #[tokio::test]
    async fn band_filter_limits_render() {
        let store = Arc::new(seeded_store(&[]));
        let mut viewer = TreeViewer::open(store, tree_path(), sample_sections(), &TosConfig::new())
            .await
            .unwrap();

        viewer.toggle_band(ArticleBand::Leaf);
        let view = viewer.render();
        assert_eq!(view.bands.len(), 1);
        assert_eq!(view.bands[0].summary.title, "Leaves");

        viewer.toggle_band(ArticleBand::Leaf);
        assert_eq!(viewer.render().bands.len(), 3);
    }

    #[tokio::test]
    async fn missing_tree_reports_not_found() {
        let store = Arc::new(MemoryDocumentStore::new());
        let viewer = TreeViewer::open(store, tree_path(), sample_sections(), &TosConfig::new())
            .await
            .unwrap();

        assert_eq!(viewer.status(), SyncStatus::Missing);
        let article = viewer.sections().root[0].clone();
        assert!(viewer.toggle_star(&article).await.unwrap_err().is_not_found());
    }

    #[test]
    fn view_serializes_flat_band_header() {
        let view = TreeView::build(&sample_sections(), &StarMap::new(), BandFilter::new(), 2);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["bands"][2]["title"], "Leaves");
        assert_eq!(json["bands"][2]["count"], 1);
        assert_eq!(json["bands"][0]["articles"][0]["starred"], false);
    }
}
