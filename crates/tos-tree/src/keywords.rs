//! Keyword aggregation
//!
//! Counts are case-insensitive; ties keep the order in which a keyword was
//! first seen.

use crate::article::Article;
use indexmap::IndexMap;

/// Keywords shown per band unless configured otherwise
pub const DEFAULT_TOP_KEYWORDS: usize = 5;

/// Up to `k` most frequent keywords, lower-cased
///
/// Keywords are lower-cased before counting. The result is ordered by
/// descending count; equal counts keep first-encountered order.
#[must_use]
pub fn most_common<I, S>(keywords: I, k: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for keyword in keywords {
        *counts.entry(keyword.as_ref().to_lowercase()).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable: ties stay in insertion order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(k).map(|(keyword, _)| keyword).collect()
}

/// Top `k` keywords across a band's articles
///
/// Articles without keywords contribute nothing.
#[must_use]
pub fn band_keywords(articles: &[Article], k: usize) -> Vec<String> {
    most_common(articles.iter().flat_map(Article::keywords), k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn case_folds_before_counting() {
        let articles = vec![
            Article::new("a").with_keywords(["A", "a"]),
            Article::new("b").with_keywords(["B"]),
        ];
        assert_eq!(band_keywords(&articles, 5), vec!["a", "b"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        assert_eq!(
            most_common(["zeta", "alpha", "Zeta", "beta", "alpha"], 3),
            vec!["zeta", "alpha", "beta"]
        );
    }

    #[test]
    fn truncates_to_k() {
        let top = most_common(["a", "b", "c", "d", "e", "f", "f"], DEFAULT_TOP_KEYWORDS);
        assert_eq!(top, vec!["f", "a", "b", "c", "d"]);
    }

    #[test]
    fn empty_band_has_no_keywords() {
        assert!(band_keywords(&[], 5).is_empty());
        assert!(band_keywords(&[Article::new("no keywords")], 5).is_empty());
    }

    proptest! {
        #[test]
        fn counts_never_increase_along_result(
            words in prop::collection::vec("[a-cA-C]{1,2}", 0..40),
            k in 0usize..8,
        ) {
            let top = most_common(&words, k);
            prop_assert!(top.len() <= k);

            let count = |kw: &str| words.iter().filter(|w| w.to_lowercase() == kw).count();
            for pair in top.windows(2) {
                prop_assert!(count(&pair[0]) >= count(&pair[1]));
            }
            for kw in &top {
                prop_assert_eq!(kw, &kw.to_lowercase());
            }
        }
    }
}
