//! Classified articles
//!
//! Produced upstream by the classifier and consumed as-is. Fields beyond
//! `label` and `keywords` are carried through untouched.

use crate::band::ArticleBand;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tos_content::StarKey;

/// One article in a band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Citation label, unique within a tree
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// Everything else the classifier attached (title, authors, year, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Keywords, empty when the classifier supplied none
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }

    /// Store-safe key for this article's star
    #[inline]
    #[must_use]
    pub fn star_key(&self) -> StarKey {
        StarKey::encode(&self.label)
    }
}

/// Classifier output: ordered articles per band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSections {
    #[serde(default)]
    pub root: Vec<Article>,
    #[serde(default)]
    pub trunk: Vec<Article>,
    #[serde(default)]
    pub leaf: Vec<Article>,
}

impl TreeSections {
    #[must_use]
    pub fn band(&self, band: ArticleBand) -> &[Article] {
        match band {
            ArticleBand::Root => &self.root,
            ArticleBand::Trunk => &self.trunk,
            ArticleBand::Leaf => &self.leaf,
        }
    }

    /// Total articles across bands
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len() + self.trunk.len() + self.leaf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_classifier_output() {
        let sections: TreeSections = serde_json::from_value(json!({
            "root": [{"label": "Smith J, 1990", "keywords": ["Trees"], "year": 1990}],
            "trunk": [{"label": "Doe A, 2005"}],
            "leaf": []
        }))
        .unwrap();

        assert_eq!(sections.len(), 2);
        let root = &sections.band(ArticleBand::Root)[0];
        assert_eq!(root.keywords(), ["Trees".to_string()]);
        assert_eq!(root.extra.get("year"), Some(&json!(1990)));
        assert!(sections.band(ArticleBand::Trunk)[0].keywords().is_empty());
    }

    #[test]
    fn missing_bands_default_to_empty() {
        let sections: TreeSections = serde_json::from_value(json!({"root": []})).unwrap();
        assert!(sections.is_empty());
    }

    #[test]
    fn star_key_encodes_label() {
        assert_eq!(Article::new("x").star_key().as_str(), "eA==");
    }

    #[test]
    fn extra_fields_round_trip() {
        let value = json!({"label": "a", "doi": "10.1/x"});
        let article: Article = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&article).unwrap(), value);
    }
}
