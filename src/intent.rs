//! Recognized intents and the capability traits the pipeline composes.
//!
//! Two capabilities exist:
//!
//! - [`IntentRecognizer`]: turns an utterance into a [`RecognizedIntent`] or
//!   nothing. Typically backed by an NLU service, a rule engine, or a regex
//!   table.
//! - [`IntentTransform`]: refines an already-recognized intent, usually by
//!   adding or rewriting entities.
//!
//! Both are async and object-safe so that chains and pipelines can hold
//! heterogeneous boxed members. Implementations must be reentrant: the same
//! value may serve many utterances concurrently, and nothing in this crate
//! synchronizes calls for them.
//!
//! A [`RecognizedIntent`] is an immutable value. Each transform step consumes
//! its input and returns a new value derived from it; the `utterance` field is
//! carried through every step unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

/// Intent name used when a recognizer produced a result but no intent scored.
pub const UNKNOWN_INTENT: &str = "unknown";

/// An utterance classified into an intent plus the entities found in it.
///
/// `entities` preserves recognition order; duplicates are allowed and
/// uniqueness is not guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedIntent<E> {
    /// The source utterance text.
    pub utterance: String,
    /// The classified intent name.
    pub intent: String,
    /// Entities in recognition order.
    pub entities: Vec<E>,
}

impl<E> RecognizedIntent<E> {
    pub fn new(utterance: impl Into<String>, intent: impl Into<String>, entities: Vec<E>) -> Self {
        Self { utterance: utterance.into(), intent: intent.into(), entities }
    }

    /// A result carrying [`UNKNOWN_INTENT`] and no entities.
    pub fn unrecognized(utterance: impl Into<String>) -> Self {
        Self { utterance: utterance.into(), intent: UNKNOWN_INTENT.to_string(), entities: Vec::new() }
    }
}

/// A capability turning an utterance into an intent plus entities, or nothing.
///
/// `Ok(None)` means "this recognizer does not own the utterance" and lets a
/// chain fall through to the next member. Errors are capability failures and
/// abort the surrounding resolution.
#[async_trait]
pub trait IntentRecognizer<C, E>: Send + Sync {
    async fn recognize(
        &self,
        context: &C,
        utterance: &str,
    ) -> Result<Option<RecognizedIntent<E>>, CapabilityError>;
}

/// A capability refining an already-recognized intent.
///
/// Implementations must return a value with the same `utterance` they
/// received; `intent` and `entities` may change.
#[async_trait]
pub trait IntentTransform<C, E>: Send + Sync {
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError>;
}

/// Boxed recognizer, the unit of composition for chains and resolvers.
pub type BoxRecognizer<C, E> = Box<dyn IntentRecognizer<C, E>>;

/// Boxed transform, the unit of composition for pipelines and combinators.
pub type BoxTransform<C, E> = Box<dyn IntentTransform<C, E>>;

#[async_trait]
impl<C, E, T> IntentRecognizer<C, E> for Box<T>
where
    C: Send + Sync,
    E: Send,
    T: IntentRecognizer<C, E> + ?Sized,
{
    async fn recognize(
        &self,
        context: &C,
        utterance: &str,
    ) -> Result<Option<RecognizedIntent<E>>, CapabilityError> {
        (**self).recognize(context, utterance).await
    }
}

#[async_trait]
impl<C, E, T> IntentTransform<C, E> for Box<T>
where
    C: Send + Sync,
    E: Send + 'static,
    T: IntentTransform<C, E> + ?Sized,
{
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        (**self).apply(context, recognized).await
    }
}
