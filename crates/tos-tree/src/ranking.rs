//! Star ranking and band summaries

use crate::article::{Article, TreeSections};
use crate::band::{ArticleBand, BandFilter};
use crate::keywords::band_keywords;
use serde::Serialize;
use tos_content::StarKey;

/// An article with its star state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArticle<'a> {
    pub article: &'a Article,
    pub key: StarKey,
    pub starred: bool,
}

/// Starred articles first, otherwise classifier order
pub fn rank_band<'a, F>(articles: &'a [Article], is_starred: F) -> Vec<RankedArticle<'a>>
where
    F: Fn(&StarKey) -> bool,
{
    let mut ranked: Vec<RankedArticle<'a>> = articles
        .iter()
        .map(|article| {
            let key = article.star_key();
            let starred = is_starred(&key);
            RankedArticle {
                article,
                key,
                starred,
            }
        })
        .collect();
    ranked.sort_by_key(|entry| !entry.starred);
    ranked
}

/// Header of one band: title, info text, size and top keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandSummary {
    pub band: ArticleBand,
    pub title: &'static str,
    pub info: &'static str,
    pub count: usize,
    pub keywords: Vec<String>,
}

impl BandSummary {
    #[must_use]
    pub fn new(band: ArticleBand, articles: &[Article], top_keywords: usize) -> Self {
        Self {
            band,
            title: band.title(),
            info: band.info(),
            count: articles.len(),
            keywords: band_keywords(articles, top_keywords),
        }
    }
}

/// Summaries of the bands `filter` lets through, in display order
#[must_use]
pub fn summarize(sections: &TreeSections, filter: BandFilter, top_keywords: usize) -> Vec<BandSummary> {
    filter
        .visible()
        .map(|band| BandSummary::new(band, sections.band(band), top_keywords))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(ranked: &[RankedArticle<'_>]) -> Vec<String> {
        ranked.iter().map(|r| r.article.label.clone()).collect()
    }

    #[test]
    fn starred_float_to_top_stably() {
        let articles: Vec<Article> = ["a", "b", "c", "d"].into_iter().map(Article::new).collect();
        let starred = [StarKey::encode("b"), StarKey::encode("d")];

        let ranked = rank_band(&articles, |key| starred.contains(key));
        assert_eq!(labels(&ranked), vec!["b", "d", "a", "c"]);
        assert!(ranked[0].starred && ranked[1].starred);
        assert!(!ranked[2].starred);
    }

    #[test]
    fn nothing_starred_keeps_order() {
        let articles: Vec<Article> = ["c", "a", "b"].into_iter().map(Article::new).collect();
        assert_eq!(labels(&rank_band(&articles, |_| false)), vec!["c", "a", "b"]);
    }

    #[test]
    fn summaries_follow_filter() {
        let sections = TreeSections {
            root: vec![Article::new("r").with_keywords(["Physics"])],
            trunk: vec![Article::new("t1"), Article::new("t2")],
            leaf: vec![],
        };

        let all = summarize(&sections, BandFilter::new(), 5);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].keywords, vec!["physics"]);
        assert_eq!(all[1].count, 2);
        assert_eq!(all[2].title, "Leaves");

        let mut filter = BandFilter::new();
        filter.toggle(ArticleBand::Trunk);
        let trunk = summarize(&sections, filter, 5);
        assert_eq!(trunk.len(), 1);
        assert_eq!(trunk[0].band, ArticleBand::Trunk);
    }
}
