//! Conditional and concurrent execution combinators.
//!
//! Three wrappers let a pipeline position decide *whether* and *how* its steps
//! run:
//!
//! - [`IntentGate`]: run wrapped steps only for specific intent names.
//! - [`PredicateGate`]: run a wrapped step only when a caller-supplied
//!   predicate holds.
//! - [`ConcurrentTransforms`]: run several independent steps against the same
//!   input snapshot at once.
//!
//! ## Concurrent merge semantics
//!
//! Every step of a [`ConcurrentTransforms`] receives its own clone of the
//! input. After all steps complete, each step's *delta* (the entities its
//! output holds beyond the snapshot's original length) is appended to the
//! snapshot in step order. Steps therefore never observe each other's writes
//! and completion timing cannot change the merged result. Steps are expected
//! to be additive: a step that removes or reorders the snapshot's own entities
//! has no way to express that here, and intent renames inside the fan-out are
//! discarded. Use a sequential [`TransformPipeline`] for steps that are not
//! independent.

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;

use crate::error::CapabilityError;
use crate::intent::{BoxTransform, IntentTransform, RecognizedIntent};

use super::transform::TransformPipeline;

/// Runs wrapped steps only when the incoming intent name is in the gate set.
///
/// On a miss the input is returned unchanged; on a hit the wrapped steps run
/// as an inline pipeline. Membership is an exact name test, no wildcards.
pub struct IntentGate<C, E> {
    intents: Vec<String>,
    steps: TransformPipeline<C, E>,
}

impl<C, E> IntentGate<C, E>
where
    C: Send + Sync,
    E: Send,
{
    /// Gate `steps` on one or more intent names.
    pub fn new<I>(intents: I, steps: Vec<BoxTransform<C, E>>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let intents: Vec<String> = intents.into_iter().map(Into::into).collect();
        debug!(?intents, "created intent gate");
        Self { intents, steps: TransformPipeline::new(steps) }
    }
}

#[async_trait]
impl<C, E> IntentTransform<C, E> for IntentGate<C, E>
where
    C: Send + Sync,
    E: Send + 'static,
{
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        // Gate sets are small; a linear scan preserves declaration order in
        // debug output and costs nothing measurable.
        if !self.intents.iter().any(|intent| *intent == recognized.intent) {
            debug!(intent = %recognized.intent, "intent gate skipped");
            return Ok(recognized);
        }

        self.steps.apply(context, recognized).await
    }
}

/// Runs the wrapped step only when `predicate` holds for the input.
///
/// The predicate must be synchronous and must not mutate anything the
/// pipeline can observe.
pub struct PredicateGate<C, E> {
    predicate: Box<dyn Fn(&C, &RecognizedIntent<E>) -> bool + Send + Sync>,
    step: BoxTransform<C, E>,
}

impl<C, E> PredicateGate<C, E>
where
    C: Send + Sync,
    E: Send,
{
    pub fn new<P>(predicate: P, step: BoxTransform<C, E>) -> Self
    where
        P: Fn(&C, &RecognizedIntent<E>) -> bool + Send + Sync + 'static,
    {
        Self { predicate: Box::new(predicate), step }
    }
}

#[async_trait]
impl<C, E> IntentTransform<C, E> for PredicateGate<C, E>
where
    C: Send + Sync,
    E: Send + 'static,
{
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        if !(self.predicate)(context, &recognized) {
            return Ok(recognized);
        }

        self.step.apply(context, recognized).await
    }
}

/// Runs independent steps concurrently against one input snapshot.
///
/// See the module docs for the delta-append merge contract. A failing step
/// fails the whole combinator.
pub struct ConcurrentTransforms<C, E> {
    steps: Vec<BoxTransform<C, E>>,
}

impl<C, E> ConcurrentTransforms<C, E>
where
    C: Send + Sync,
    E: Send,
{
    pub fn new(steps: Vec<BoxTransform<C, E>>) -> Self {
        debug!(count = steps.len(), "created concurrent transform set");
        Self { steps }
    }
}

#[async_trait]
impl<C, E> IntentTransform<C, E> for ConcurrentTransforms<C, E>
where
    C: Send + Sync,
    E: Send + Sync + Clone + 'static,
{
    async fn apply(
        &self,
        context: &C,
        recognized: RecognizedIntent<E>,
    ) -> Result<RecognizedIntent<E>, CapabilityError> {
        let snapshot_len = recognized.entities.len();

        let outputs =
            try_join_all(self.steps.iter().map(|step| step.apply(context, recognized.clone())))
                .await?;

        // Deterministic merge: keep the snapshot, then append each step's
        // additions in declaration order.
        let mut merged = recognized;
        for output in outputs {
            merged.entities.extend(output.entities.into_iter().skip(snapshot_len));
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;
    use std::time::Duration;

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

    /// Sleeps before appending, to shuffle completion order in the fan-out.
    struct SlowMarkerTransform(&'static str, u64);

    #[async_trait]
    impl IntentTransform<(), Entity> for SlowMarkerTransform {
        async fn apply(
            &self,
            _context: &(),
            mut recognized: RecognizedIntent<Entity>,
        ) -> Result<RecognizedIntent<Entity>, CapabilityError> {
            tokio::time::sleep(Duration::from_millis(self.1)).await;
            recognized
                .entities
                .push(Entity::Simple { name: self.0.to_string(), utterance_offsets: None });
            Ok(recognized)
        }
    }

    fn entity_names(result: &RecognizedIntent<Entity>) -> Vec<&str> {
        result.entities.iter().map(|e| e.name()).collect()
    }

    fn order_intent(intent: &str) -> RecognizedIntent<Entity> {
        RecognizedIntent::new("book me a flight", intent, Vec::new())
    }

    #[tokio::test]
    async fn intent_gate_skips_other_intents() {
        let gate = IntentGate::new(["book-flight"], vec![Box::new(MarkerTransform("enriched")) as _]);

        let input = order_intent("cancel-flight");
        let output = gate.apply(&(), input.clone()).await.unwrap();

        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn intent_gate_runs_steps_for_matching_intent() {
        let gate = IntentGate::new(["book-flight"], vec![
            Box::new(MarkerTransform("first")) as _,
            Box::new(MarkerTransform("second")) as _,
        ]);

        let output = gate.apply(&(), order_intent("book-flight")).await.unwrap();

        assert_eq!(entity_names(&output), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn intent_gate_accepts_a_set_of_names() {
        let gate = IntentGate::new(["book-flight", "book-hotel"], vec![
            Box::new(MarkerTransform("enriched")) as _,
        ]);

        let hotel = gate.apply(&(), order_intent("book-hotel")).await.unwrap();
        assert_eq!(entity_names(&hotel), vec!["enriched"]);

        let train = gate.apply(&(), order_intent("book-train")).await.unwrap();
        assert!(train.entities.is_empty());
    }

    #[tokio::test]
    async fn predicate_gate_passes_input_through_when_false() {
        let gate = PredicateGate::new(
            |_: &(), recognized: &RecognizedIntent<Entity>| recognized.entities.len() > 10,
            Box::new(MarkerTransform("enriched")) as _,
        );

        let input = order_intent("book-flight");
        let output = gate.apply(&(), input.clone()).await.unwrap();
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn predicate_gate_applies_step_when_true() {
        let gate = PredicateGate::new(
            |_: &(), recognized: &RecognizedIntent<Entity>| recognized.intent == "book-flight",
            Box::new(MarkerTransform("enriched")) as _,
        );

        let output = gate.apply(&(), order_intent("book-flight")).await.unwrap();
        assert_eq!(entity_names(&output), vec!["enriched"]);
    }

    #[tokio::test]
    async fn concurrent_deltas_merge_in_step_order() {
        // The first step finishes last; the merge must still list its delta
        // first because merge order is declaration order.
        let fanout = ConcurrentTransforms::new(vec![
            Box::new(SlowMarkerTransform("from-slow", 30)) as _,
            Box::new(SlowMarkerTransform("from-fast", 1)) as _,
            Box::new(MarkerTransform("from-immediate")) as _,
        ]);

        let mut input = order_intent("book-flight");
        input.entities.push(Entity::Simple { name: "existing".to_string(), utterance_offsets: None });

        let output = fanout.apply(&(), input).await.unwrap();

        assert_eq!(
            entity_names(&output),
            vec!["existing", "from-slow", "from-fast", "from-immediate"]
        );
    }

    #[tokio::test]
    async fn concurrent_steps_observe_the_same_snapshot() {
        /// Fails if it can see another step's marker.
        struct IsolationCheck;

        #[async_trait]
        impl IntentTransform<(), Entity> for IsolationCheck {
            async fn apply(
                &self,
                _context: &(),
                mut recognized: RecognizedIntent<Entity>,
            ) -> Result<RecognizedIntent<Entity>, CapabilityError> {
                tokio::time::sleep(Duration::from_millis(20)).await;
                assert_eq!(recognized.entities.len(), 1, "step saw another step's writes");
                recognized
                    .entities
                    .push(Entity::Simple { name: "checked".to_string(), utterance_offsets: None });
                Ok(recognized)
            }
        }

        let fanout = ConcurrentTransforms::new(vec![
            Box::new(MarkerTransform("early")) as _,
            Box::new(IsolationCheck) as _,
        ]);

        let mut input = order_intent("book-flight");
        input.entities.push(Entity::Simple { name: "existing".to_string(), utterance_offsets: None });

        let output = fanout.apply(&(), input).await.unwrap();
        assert_eq!(entity_names(&output), vec!["existing", "early", "checked"]);
    }

    #[tokio::test]
    async fn concurrent_intent_renames_are_discarded() {
        struct RenameTransform;

        #[async_trait]
        impl IntentTransform<(), Entity> for RenameTransform {
            async fn apply(
                &self,
                _context: &(),
                mut recognized: RecognizedIntent<Entity>,
            ) -> Result<RecognizedIntent<Entity>, CapabilityError> {
                recognized.intent = "hijacked".to_string();
                Ok(recognized)
            }
        }

        let fanout = ConcurrentTransforms::new(vec![Box::new(RenameTransform) as _]);

        let output = fanout.apply(&(), order_intent("book-flight")).await.unwrap();
        assert_eq!(output.intent, "book-flight");
    }
}
