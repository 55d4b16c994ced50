//! Exact search engine - folded substring matching

use async_trait::async_trait;

use crate::traits::{in_scope, paginate, Result, SearchDocument, SearchEngine, SearchHit};
use larder_core::{collation, SearchQuery};

/// Case and diacritic insensitive substring search (stateless)
///
/// Hits come back in natural name order; every hit scores 1.0.
pub struct ExactSearchEngine;

impl ExactSearchEngine {
    pub fn new() -> Self {
        Self
    }

    fn matches(doc: &SearchDocument, text: Option<&str>) -> bool {
        match text {
            Some(text) => collation::contains(&doc.name, text),
            None => true,
        }
    }
}

impl Default for ExactSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for ExactSearchEngine {
    async fn search(&self, query: &SearchQuery, documents: &[SearchDocument]) -> Result<Vec<SearchHit>> {
        let text = query.text.as_deref();
        let mut hits: Vec<SearchHit> = in_scope(query, documents)
            .filter(|doc| Self::matches(doc, text))
            .map(|doc| SearchHit {
                document: doc.clone(),
                score: 1.0,
            })
            .collect();

        hits.sort_by(|a, b| {
            collation::compare(&a.document.name, &b.document.name)
                .then_with(|| a.document.entity.cmp(&b.document.entity))
        });

        tracing::debug!("Exact search matched {} documents", hits.len());
        Ok(paginate(query, hits))
    }
}
