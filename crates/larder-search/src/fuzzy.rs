//! Fuzzy search using nucleo-matcher

use async_trait::async_trait;
use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};

use crate::exact::ExactSearchEngine;
use crate::traits::{in_scope, paginate, Result, SearchDocument, SearchEngine, SearchHit};
use larder_core::{collation, SearchQuery};

/// Stateless fuzzy search engine using nucleo
///
/// Best score first. Without query text this falls back to listing every
/// in-scope document in name order.
pub struct FuzzySearchEngine {
    /// Hits scoring below this fraction of the best hit are dropped
    pub threshold: f32,
}

impl FuzzySearchEngine {
    pub fn new() -> Self {
        Self { threshold: 0.0 }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

impl Default for FuzzySearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for FuzzySearchEngine {
    async fn search(&self, query: &SearchQuery, documents: &[SearchDocument]) -> Result<Vec<SearchHit>> {
        let text = match query.text.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => return ExactSearchEngine::new().search(query, documents).await,
        };

        let pattern = Pattern::new(
            text,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        let mut scored: Vec<(&SearchDocument, u32)> = in_scope(query, documents)
            .filter_map(|doc| {
                pattern
                    .score(Utf32Str::new(&doc.name, &mut buf), &mut matcher)
                    .map(|score| (doc, score))
            })
            .collect();

        // Sort by score descending
        scored.sort_by(|(a, sa), (b, sb)| {
            sb.cmp(sa)
                .then_with(|| collation::compare(&a.name, &b.name))
        });

        let best = scored.first().map_or(0, |(_, score)| *score) as f32;
        let hits = scored
            .into_iter()
            .map(|(doc, score)| SearchHit {
                document: doc.clone(),
                score: if best > 0.0 { score as f32 / best } else { 0.0 },
            })
            .filter(|hit| hit.score >= self.threshold)
            .collect::<Vec<_>>();

        tracing::debug!("Fuzzy search for '{}' matched {} documents", text, hits.len());
        Ok(paginate(query, hits))
    }
}
