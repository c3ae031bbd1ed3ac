//! Resolution pipeline.
//!
//! This module is the public entry point for composing recognizers and
//! transforms into a single utterance-in, intent-out function.
//!
//! ## How the parts work together
//!
//! Processing an utterance is a one-way flow:
//!
//! ```text
//! recognizers ──┐
//!               │  RecognizerChain::new            (chain.rs)
//!               └───────────────┬──────────────────
//!                               │
//! utterance ────────────────────┼─ first non-null result wins
//!                               ▼
//!                    RecognizedIntent | None ── None short-circuits out
//!                               │
//!                               ▼
//!                  TransformPipeline::apply        (transform.rs)
//!                    - sequential fold over steps
//!                    - gates skip, fan-outs branch (combinators.rs)
//!                               │
//!                               ▼
//!                       RecognizedIntent
//! ```
//!
//! [`IntentResolver`] (resolver.rs) owns the composition: it calls the
//! recognizer, short-circuits on `None`, and otherwise hands the result to the
//! transform. Stages of one utterance never overlap; the only deliberate
//! concurrency is [`ConcurrentTransforms`], which fans independent steps out
//! against one snapshot and merges their deltas deterministically.
//!
//! ## Responsibilities by module
//!
//! - `chain.rs`: ordered first-match-wins recognizer chain.
//! - `transform.rs`: sequential transform pipeline (empty pipeline is the
//!   identity).
//! - `combinators.rs`: intent gate, predicate gate, and concurrent fan-out.
//! - `resolver.rs`: recognizer × transform composition, plus a transform that
//!   re-resolves through an inner resolver.
//!
//! ## Errors
//!
//! Composition mistakes surface as [`crate::ConfigurationError`] at
//! construction. Capability failures ([`crate::CapabilityError`]) abort the
//! whole resolution; partial pipeline progress is never salvaged.

#[path = "pipeline/chain.rs"]
mod chain;
#[path = "pipeline/combinators.rs"]
mod combinators;
#[path = "pipeline/resolver.rs"]
mod resolver;
#[path = "pipeline/transform.rs"]
mod transform;

pub use chain::RecognizerChain;
pub use combinators::{ConcurrentTransforms, IntentGate, PredicateGate};
pub use resolver::{IntentResolver, ResolverTransform};
pub use transform::TransformPipeline;
