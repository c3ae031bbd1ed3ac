//! Fuzzy pattern index and query ranking.
//!
//! A [`FuzzyTextMatcher`] is built once from a finite sequence of
//! pattern/payload pairs and is read-only afterwards, so one matcher may serve
//! any number of concurrent `matches` calls. Ranking a query proceeds in
//! fixed order:
//!
//! ```text
//! query ── tokenize ──▶ score every registered pattern
//!                             │
//!                             ▼
//!                    dedup by payload identity
//!                    (keep the best-scoring occurrence)
//!                             │
//!                             ▼
//!                    inclusive threshold filter
//!                             │
//!                             ▼
//!                    stable sort, score descending
//! ```
//!
//! ## Design notes
//!
//! - Payload identity is value equality (`PartialEq`). Several patterns may
//!   map to one logical payload (synonyms, spelling variants); the result set
//!   carries at most one entry per distinct payload, scored by its best
//!   pattern.
//! - The threshold is inclusive: a candidate survives when
//!   `score >= min_score`. A threshold of `0.0` therefore still admits
//!   zero-scoring candidates, while no threshold at all returns every scored
//!   candidate.
//! - The final sort is stable, so candidates with equal scores stay in
//!   registration order. Tests rely on this rather than re-ordering ties.
//! - An empty or whitespace-only query returns an empty result set without
//!   consulting the scorer.

use std::cmp::Ordering;

use tracing::debug;

use super::term::{LevenshteinScorer, TermScorer, tokenize};

/// A pattern string paired with the opaque payload reported when it matches.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyItemDefinition<M> {
    /// Pattern text; tokenized once at matcher construction.
    pub pattern: String,
    /// Payload returned for queries that match this pattern.
    pub payload: M,
}

impl<M> FuzzyItemDefinition<M> {
    pub fn new(pattern: impl Into<String>, payload: M) -> Self {
        Self { pattern: pattern.into(), payload }
    }
}

/// A scored match; higher scores are more similar and `1.0` is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatchResult<M> {
    pub payload: M,
    pub score: f64,
}

struct IndexedItem<M> {
    terms: Vec<String>,
    payload: M,
}

/// Ranks free text against a registered set of fuzzy patterns.
///
/// Construction fully consumes the item sequence exactly once. An empty item
/// sequence is valid and yields a matcher that never matches.
pub struct FuzzyTextMatcher<M, S = LevenshteinScorer> {
    items: Vec<IndexedItem<M>>,
    scorer: S,
    min_score: Option<f64>,
}

impl<M> FuzzyTextMatcher<M, LevenshteinScorer> {
    /// Build a matcher with the default scorer and no score threshold.
    pub fn new(items: impl IntoIterator<Item = FuzzyItemDefinition<M>>) -> Self {
        Self::with_scorer(items, LevenshteinScorer, None)
    }

    /// Build a matcher that drops results scoring below `min_score`
    /// (inclusive: a result scoring exactly `min_score` survives).
    pub fn with_threshold(
        items: impl IntoIterator<Item = FuzzyItemDefinition<M>>,
        min_score: f64,
    ) -> Self {
        Self::with_scorer(items, LevenshteinScorer, Some(min_score))
    }
}

impl<M, S: TermScorer> FuzzyTextMatcher<M, S> {
    /// Build a matcher with a custom scorer and optional threshold.
    pub fn with_scorer(
        items: impl IntoIterator<Item = FuzzyItemDefinition<M>>,
        scorer: S,
        min_score: Option<f64>,
    ) -> Self {
        let items: Vec<IndexedItem<M>> = items
            .into_iter()
            .map(|item| IndexedItem { terms: tokenize(&item.pattern), payload: item.payload })
            .collect();

        debug!(patterns = items.len(), ?min_score, "built fuzzy text matcher");

        Self { items, scorer, min_score }
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rank `query` against every registered pattern.
    ///
    /// Results are sorted by descending score and contain at most one entry
    /// per distinct payload. The same query always produces the same ordered
    /// results.
    pub fn matches(&self, query: &str) -> Vec<FuzzyMatchResult<M>>
    where
        M: PartialEq + Clone,
    {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        // One candidate per distinct payload, best score wins, discovery
        // order preserved for equal scores.
        let mut candidates: Vec<FuzzyMatchResult<&M>> = Vec::new();
        for item in &self.items {
            let score = self.scorer.score(&query_terms, &item.terms);
            match candidates.iter_mut().find(|c| *c.payload == item.payload) {
                Some(existing) => {
                    if score > existing.score {
                        existing.score = score;
                    }
                }
                None => candidates.push(FuzzyMatchResult { payload: &item.payload, score }),
            }
        }

        if let Some(min_score) = self.min_score {
            candidates.retain(|c| c.score >= min_score);
        }

        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        candidates
            .into_iter()
            .map(|c| FuzzyMatchResult { payload: c.payload.clone(), score: c.score })
            .collect()
    }
}
