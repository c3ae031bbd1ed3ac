//! Resolver composition.
//!
//! An [`IntentResolver`] is the top of the stack: exactly one recognizer (or
//! chain) composed with at most one transform (or pipeline), exposed as a
//! single utterance-in, intent-out call.

use async_trait::async_trait;
use tracing::debug;

use crate::error::CapabilityError;
use crate::intent::{
    BoxRecognizer, BoxTransform, IntentRecognizer, IntentTransform, RecognizedIntent,
};

/// Composes a recognizer with an optional transform.
///
/// The resolver holds no per-utterance state, so one instance may serve any
/// number of concurrent callers as long as its recognizer and transform are
/// themselves reentrant. Cancellation and timeouts are the caller's concern;
/// abandoning the returned future abandons the in-flight stages with it.
pub struct IntentResolver<C, E> {
    recognizer: BoxRecognizer<C, E>,
    transform: Option<BoxTransform<C, E>>,
}

impl<C, E> IntentResolver<C, E>
where
    C: Send + Sync,
    E: Send + 'static,
{
    /// A resolver that returns recognition results as-is.
    pub fn new<R>(recognizer: R) -> Self
    where
        R: IntentRecognizer<C, E> + 'static,
    {
        Self { recognizer: Box::new(recognizer), transform: None }
    }

    /// A resolver that refines every recognition result with `transform`.
    pub fn with_transform<R, T>(recognizer: R, transform: T) -> Self
    where
        R: IntentRecognizer<C, E> + 'static,
        T: IntentTransform<C, E> + 'static,
    {
        Self { recognizer: Box::new(recognizer), transform: Some(Box::new(transform)) }
    }

    /// Recognize and refine one utterance.
    ///
    /// Returns `Ok(None)` when the recognizer declines the utterance; the
    /// transform is never invoked on a non-result.
    pub async fn process_utterance(
        &self,
        context: &C,
        utterance: &str,
    ) -> Result<Option<RecognizedIntent<E>>, CapabilityError> {
        let Some(recognized) = self.recognizer.recognize(context, utterance).await? else {
            debug!(utterance, "utterance not recognized");
            return Ok(None);
        };

        match &self.transform {
            Some(transform) => Ok(Some(transform.apply(context, recognized).await?)),
            None => Ok(Some(recognized)),
        }
    }
}

/// A transform that re-resolves the carried utterance with an inner resolver.
///
/// Useful for second-pass resolution: when the inner resolver produces a new
/// intent it replaces the current one, and when it declines the original
/// result flows on unchanged.
pub struct ResolverTransform<C, E> {
    resolver: IntentResolver<C, E>,
}

impl<C, E> ResolverTransform<C, E> {
    pub fn new(resolver: IntentResolver<C, E>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<C, E> IntentTransform<C, E> for ResolverTransform<C, E>
where
    C: Send + Sync,
    E: Send + Sync + 'static,
{
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        match self.resolver.process_utterance(context, &recognized.utterance).await? {
            Some(reresolved) => Ok(reresolved),
            None => Ok(recognized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticRecognizer {
        intent: Option<&'static str>,
    }

    #[async_trait]
    impl IntentRecognizer<(), Entity> for StaticRecognizer {
        async fn recognize(
            &self,
            _context: &(),
            utterance: &str,
        ) -> Result<Option<RecognizedIntent<Entity>>, CapabilityError> {
            Ok(self.intent.map(|intent| RecognizedIntent::new(utterance, intent, Vec::new())))
        }
    }

    struct CountingTransform {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IntentTransform<(), Entity> for CountingTransform {
        async fn apply(
            &self,
            _context: &(),
            mut recognized: RecognizedIntent<Entity>,
        ) -> Result<RecognizedIntent<Entity>, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            recognized
                .entities
                .push(Entity::Simple { name: "transformed".to_string(), utterance_offsets: None });
            Ok(recognized)
        }
    }

    #[tokio::test]
    async fn transform_is_not_invoked_on_a_non_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = IntentResolver::with_transform(
            StaticRecognizer { intent: None },
            CountingTransform { calls: calls.clone() },
        );

        let result = resolver.process_utterance(&(), "gibberish").await.unwrap();

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transform_refines_a_recognized_intent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = IntentResolver::with_transform(
            StaticRecognizer { intent: Some("order-item") },
            CountingTransform { calls: calls.clone() },
        );

        let result = resolver.process_utterance(&(), "a burger please").await.unwrap().unwrap();

        assert_eq!(result.intent, "order-item");
        assert_eq!(result.entities.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn without_transform_the_recognition_is_returned_unchanged() {
        let resolver = IntentResolver::new(StaticRecognizer { intent: Some("order-item") });

        let result = resolver.process_utterance(&(), "a burger please").await.unwrap().unwrap();

        assert_eq!(result.intent, "order-item");
        assert!(result.entities.is_empty());
    }

    #[tokio::test]
    async fn resolver_transform_falls_back_to_its_input() {
        let declining = ResolverTransform::new(IntentResolver::new(StaticRecognizer { intent: None }));

        let input = RecognizedIntent::new("two teas", "order-item", Vec::new());
        let output = declining.apply(&(), input.clone()).await.unwrap();
        assert_eq!(output, input);

        let replacing = ResolverTransform::new(IntentResolver::new(StaticRecognizer {
            intent: Some("order-drink"),
        }));

        let output = replacing.apply(&(), input).await.unwrap();
        assert_eq!(output.intent, "order-drink");
        assert_eq!(output.utterance, "two teas");
    }
}
