//! Composable intent resolution for conversational agents.
//!
//! Given an utterance, produce a recognized intent plus a set of typed
//! entities, then progressively refine that result through composable
//! transform steps. Data flows one direction:
//!
//! ```text
//! utterance ──▶ IntentRecognizer(s) ──▶ RecognizedIntent | None
//!                                              │
//!                                              ▼
//!                              IntentTransform step(s)
//!                        (gates, fan-outs, fuzzy enrichment)
//!                                              │
//!                                              ▼
//!                                 final RecognizedIntent
//! ```
//!
//! Recognizers and transforms are async capabilities behind small traits, so
//! a regex table, a rule engine, and a cloud NLU client all compose the same
//! way. The [fuzzy matching subsystem](crate::FuzzyTextMatcher) ranks free
//! text from entities against a registered pattern set and plugs into the
//! pipeline as an ordinary transform step.
//!
//! # Example
//!
//! ```no_run
//! use intentive::{Entity, IntentPattern, IntentResolver, PatternRecognizer};
//! use regex::Regex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recognizer = PatternRecognizer::new(vec![IntentPattern::new(
//!         Regex::new(r"(?i)\b(hello|hi)\b")?,
//!         "greet",
//!     )]);
//!
//!     let resolver: IntentResolver<(), Entity> = IntentResolver::new(recognizer);
//!
//!     let result = resolver.process_utterance(&(), "hello there").await?;
//!     assert_eq!(result.unwrap().intent, "greet");
//!     Ok(())
//! }
//! ```
//!
//! Logging goes through `tracing`; the crate emits debug events at pipeline
//! seams and never installs a subscriber of its own.

mod entities;
mod error;
mod fuzzy;
mod intent;
mod pattern;
mod pipeline;

pub use entities::{Entity, UtteranceOffsets};
pub use error::{CapabilityError, ConfigurationError};
pub use fuzzy::{
    EntityMatchBinder, EntityWordSelector, FuzzyEntityTransform, FuzzyItemDefinition,
    FuzzyMatchResult, FuzzyTextMatcher, FuzzyUtteranceEnricher, LevenshteinScorer,
    MatchEntityBuilder, TermScorer, tokenize,
};
pub use intent::{
    BoxRecognizer, BoxTransform, IntentRecognizer, IntentTransform, RecognizedIntent,
    UNKNOWN_INTENT,
};
pub use pattern::{IntentPattern, PatternRecognizer};
pub use pipeline::{
    ConcurrentTransforms, IntentGate, IntentResolver, PredicateGate, RecognizerChain,
    ResolverTransform, TransformPipeline,
};
