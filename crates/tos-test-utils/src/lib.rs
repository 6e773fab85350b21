//! Testing utilities for the Tree of Science workspace
//!
//! Shared test helpers and fixtures.

#![allow(missing_docs)]

use serde_json::{Map, Value};
use tos_annotation::{DocumentPath, MemoryDocumentStore, TreeDocument, STARS_FIELD};
use tos_content::StarKey;
use tos_registry::{ArticleRef, FileRecord, ParsedContent};
use tos_tree::{Article, TreeSections};

pub const TREE_PATH: &str = "trees/test-tree";

pub fn tree_path() -> DocumentPath {
    DocumentPath::new(TREE_PATH).unwrap()
}

/// Record for `content`, already marked valid
pub fn valid_record(name: &str, content: &str) -> FileRecord {
    FileRecord::new(name, content.as_bytes().to_vec()).with_valid(true)
}

pub fn parsed_content(articles: &[&str], citations: &[&str], keywords: &[&str]) -> ParsedContent {
    ParsedContent {
        articles: articles.iter().copied().map(ArticleRef::new).collect(),
        citations: citations.iter().copied().map(ArticleRef::new).collect(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
    }
}

/// Tree document whose stars are keyed by the encoded `labels`
pub fn tree_document(stars: &[(&str, bool)]) -> TreeDocument {
    let entries: Map<String, Value> = stars
        .iter()
        .map(|(label, starred)| (StarKey::encode(label).into(), Value::Bool(*starred)))
        .collect();
    TreeDocument::new()
        .with_field("name", Value::String("test tree".into()))
        .with_field(STARS_FIELD, Value::Object(entries))
}

/// Store holding [`tree_document`] at [`tree_path`]
pub fn seeded_store(stars: &[(&str, bool)]) -> MemoryDocumentStore {
    MemoryDocumentStore::with_document(tree_path(), tree_document(stars))
}

pub fn article(label: &str, keywords: &[&str]) -> Article {
    Article::new(label).with_keywords(keywords.iter().copied())
}

pub fn sample_sections() -> TreeSections {
    TreeSections {
        root: vec![
            article("Novoselov K, 2004, SCIENCE", &["Graphene", "Electric field"]),
            article("Geim A, 2007, NAT MATER", &["graphene"]),
        ],
        trunk: vec![
            article("Castro Neto A, 2009, REV MOD PHYS", &["Graphene", "Electronic properties"]),
            Article::new("Bonaccorso F, 2010, NAT PHOTONICS"),
        ],
        leaf: vec![article("Ferrari A, 2015, NANOSCALE", &["Roadmap", "graphene"])],
    }
}
