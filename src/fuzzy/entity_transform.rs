//! Pipeline steps backed by a [`FuzzyTextMatcher`].
//!
//! Two steps are provided:
//!
//! - [`FuzzyEntityTransform`] runs the matcher once per entity whose word
//!   selector yields text, and rebuilds that entity from its match results.
//!   Entities the selector skips pass through untouched.
//! - [`FuzzyUtteranceEnricher`] runs the matcher over the whole utterance and
//!   appends one entity per match.
//!
//! Both are ordinary [`IntentTransform`] steps and compose with the gates and
//! pipelines in [`crate::pipeline`].

use async_trait::async_trait;
use tracing::debug;

use crate::error::CapabilityError;
use crate::intent::{IntentTransform, RecognizedIntent};

use super::matcher::{FuzzyMatchResult, FuzzyTextMatcher};
use super::term::{LevenshteinScorer, TermScorer};

/// Selects the text an entity contributes to fuzzy matching; `None` skips the
/// entity entirely.
pub type EntityWordSelector<E> = Box<dyn Fn(&E) -> Option<String> + Send + Sync>;

/// Rebuilds an entity from its ranked match results (possibly empty).
pub type EntityMatchBinder<E, M> =
    Box<dyn Fn(E, Vec<FuzzyMatchResult<M>>) -> E + Send + Sync>;

/// Builds the entity appended for one utterance-level match.
pub type MatchEntityBuilder<E, M> = Box<dyn Fn(FuzzyMatchResult<M>) -> E + Send + Sync>;

/// Per-entity fuzzy enrichment step.
pub struct FuzzyEntityTransform<E, M, S = LevenshteinScorer> {
    matcher: FuzzyTextMatcher<M, S>,
    selector: EntityWordSelector<E>,
    binder: EntityMatchBinder<E, M>,
}

impl<E, M, S> FuzzyEntityTransform<E, M, S> {
    pub fn new(
        matcher: FuzzyTextMatcher<M, S>,
        selector: EntityWordSelector<E>,
        binder: EntityMatchBinder<E, M>,
    ) -> Self {
        Self { matcher, selector, binder }
    }
}

#[async_trait]
impl<C, E, M, S> IntentTransform<C, E> for FuzzyEntityTransform<E, M, S>
where
    C: Send + Sync,
    E: Send,
    M: PartialEq + Clone + Send + Sync,
    S: TermScorer,
{
    async fn apply(
        &self,
        _context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        let RecognizedIntent { utterance, intent, entities } = recognized;

        debug!(entity_count = entities.len(), "fuzzy matching entities");

        let entities = entities
            .into_iter()
            .map(|entity| match (self.selector)(&entity) {
                None => entity,
                Some(words) => {
                    let matches = self.matcher.matches(&words);
                    debug!(words = %words, matches = matches.len(), "entity fuzzy matched");
                    (self.binder)(entity, matches)
                }
            })
            .collect();

        Ok(RecognizedIntent { utterance, intent, entities })
    }
}

/// Whole-utterance fuzzy enrichment step; appends one entity per match.
pub struct FuzzyUtteranceEnricher<E, M, S = LevenshteinScorer> {
    matcher: FuzzyTextMatcher<M, S>,
    builder: MatchEntityBuilder<E, M>,
}

impl<E, M, S> FuzzyUtteranceEnricher<E, M, S> {
    pub fn new(matcher: FuzzyTextMatcher<M, S>, builder: MatchEntityBuilder<E, M>) -> Self {
        Self { matcher, builder }
    }
}

#[async_trait]
impl<C, E, M, S> IntentTransform<C, E> for FuzzyUtteranceEnricher<E, M, S>
where
    C: Send + Sync,
    E: Send,
    M: PartialEq + Clone + Send + Sync,
    S: TermScorer,
{
    async fn apply(
        &self,
        _context: &C,
        mut recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        let matches = self.matcher.matches(&recognized.utterance);

        debug!(matches = matches.len(), "fuzzy matched full utterance");

        recognized.entities.extend(matches.into_iter().map(|result| (self.builder)(result)));

        Ok(recognized)
    }
}
