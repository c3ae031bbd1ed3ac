//! Sequential transform pipeline.

use async_trait::async_trait;
use tracing::debug;

use crate::error::CapabilityError;
use crate::intent::{BoxTransform, IntentTransform, RecognizedIntent};

/// Runs transform steps in order; each step's output is the next step's input.
///
/// A pipeline with zero steps is the identity. Steps share no state beyond
/// the [`RecognizedIntent`] value flowing through them, and two stages of the
/// same utterance never run concurrently.
pub struct TransformPipeline<C, E> {
    steps: Vec<BoxTransform<C, E>>,
}

impl<C, E> TransformPipeline<C, E>
where
    C: Send + Sync,
    E: Send,
{
    /// Build a pipeline from steps in execution order. Empty is valid.
    pub fn new(steps: Vec<BoxTransform<C, E>>) -> Self {
        debug!(count = steps.len(), "created transform pipeline");
        Self { steps }
    }
}

#[async_trait]
impl<C, E> IntentTransform<C, E> for TransformPipeline<C, E>
where
    C: Send + Sync,
    E: Send + 'static,
{
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        let mut result = recognized;

        for step in &self.steps {
            result = step.apply(context, result).await?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;

    /// Appends a marker entity so tests can observe execution order.
    struct MarkerTransform(&'static str);

    #[async_trait]
    impl IntentTransform<(), Entity> for MarkerTransform {
        async fn apply(
            &self,
            _context: &(),
            mut recognized: RecognizedIntent<Entity>,
        ) -> Result<RecognizedIntent<Entity>, CapabilityError> {
            recognized
                .entities
                .push(Entity::Simple { name: self.0.to_string(), utterance_offsets: None });
            Ok(recognized)
        }
    }

    fn marker_names(result: &RecognizedIntent<Entity>) -> Vec<&str> {
        result.entities.iter().map(|e| e.name()).collect()
    }

    #[tokio::test]
    async fn empty_pipeline_is_identity() {
        let pipeline = TransformPipeline::new(Vec::new());
        let input = RecognizedIntent::new("hello", "greet", vec![Entity::Simple {
            name: "existing".to_string(),
            utterance_offsets: None,
        }]);

        let output = pipeline.apply(&(), input.clone()).await.unwrap();
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn steps_fold_in_order() {
        let pipeline = TransformPipeline::new(vec![
            Box::new(MarkerTransform("step-1")) as _,
            Box::new(MarkerTransform("step-2")) as _,
            Box::new(MarkerTransform("step-3")) as _,
        ]);

        let output =
            pipeline.apply(&(), RecognizedIntent::new("hello", "greet", Vec::new())).await.unwrap();

        assert_eq!(output.utterance, "hello");
        assert_eq!(output.intent, "greet");
        assert_eq!(marker_names(&output), vec!["step-1", "step-2", "step-3"]);
    }

    #[tokio::test]
    async fn pipeline_equals_manual_fold() {
        let pipeline = TransformPipeline::new(vec![
            Box::new(MarkerTransform("a")) as _,
            Box::new(MarkerTransform("b")) as _,
        ]);

        let input: RecognizedIntent<Entity> = RecognizedIntent::new("x", "y", Vec::new());

        let piped = pipeline.apply(&(), input.clone()).await.unwrap();

        let mut folded = input;
        folded = MarkerTransform("a").apply(&(), folded).await.unwrap();
        folded = MarkerTransform("b").apply(&(), folded).await.unwrap();

        assert_eq!(piped, folded);
    }
}
