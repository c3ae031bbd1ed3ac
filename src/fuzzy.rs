//! Fuzzy entity matching.
//!
//! This subsystem ranks free text against a registered set of patterns, each
//! carrying an opaque payload. It is used from entity-level transform steps
//! (score the text one entity selected) and from utterance-level enrichment
//! (score the whole input), but the matcher itself knows nothing about
//! intents or entities.
//!
//! ```text
//! FuzzyItemDefinition(pattern, payload) ─┐
//!                                        │  FuzzyTextMatcher::new
//!                                        └────────────┬───────────
//!                                                     │  (index built once,
//!                                                     │   read-only after)
//! query ── tokenize ── TermScorer ── dedup/threshold/sort ──▶ FuzzyMatchResult
//! ```
//!
//! The scoring primitive lives behind the [`TermScorer`] trait in `term.rs`;
//! the default is an edit-distance scorer. `matcher.rs` owns indexing and
//! ranking; `entity_transform.rs` adapts the matcher into pipeline steps.

#[path = "fuzzy/entity_transform.rs"]
mod entity_transform;
#[path = "fuzzy/matcher.rs"]
mod matcher;
#[path = "fuzzy/term.rs"]
mod term;

pub use entity_transform::{
    EntityMatchBinder, EntityWordSelector, FuzzyEntityTransform, FuzzyUtteranceEnricher,
    MatchEntityBuilder,
};
pub use matcher::{FuzzyItemDefinition, FuzzyMatchResult, FuzzyTextMatcher};
pub use term::{LevenshteinScorer, TermScorer, tokenize};
