//! Ordered recognizer chain.
//!
//! The chain tries its members in the supplied order and stops at the first
//! recognizer that produces a result. Order is significant and entirely
//! caller-controlled: there is no retry and no scoring across members, so
//! first-match-wins, not best-match-wins.
//!
//! Members are awaited strictly one at a time. A later recognizer must not
//! start until the earlier one has resolved, because intent semantics assume
//! at most one recognizer owns the utterance.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CapabilityError, ConfigurationError};
use crate::intent::{BoxRecognizer, IntentRecognizer, RecognizedIntent};

/// A first-match-wins sequence of recognizers.
///
/// The chain itself implements [`IntentRecognizer`], so chains can be nested
/// inside other chains or handed to a resolver directly.
pub struct RecognizerChain<C, E> {
    recognizers: Vec<BoxRecognizer<C, E>>,
}

impl<C, E> RecognizerChain<C, E>
where
    C: Send + Sync,
    E: Send,
{
    /// Build a chain from recognizers in execution order.
    ///
    /// Fails fast with [`ConfigurationError::EmptyRecognizerChain`] when no
    /// recognizers are supplied.
    pub fn new(recognizers: Vec<BoxRecognizer<C, E>>) -> Result<Self, ConfigurationError> {
        if recognizers.is_empty() {
            return Err(ConfigurationError::EmptyRecognizerChain);
        }

        debug!(count = recognizers.len(), "created recognizer chain");

        Ok(Self { recognizers })
    }
}

#[async_trait]
impl<C, E> IntentRecognizer<C, E> for RecognizerChain<C, E>
where
    C: Send + Sync,
    E: Send,
{
    async fn recognize(
        &self,
        context: &C,
        utterance: &str,
    ) -> Result<Option<RecognizedIntent<E>>, CapabilityError> {
        debug!(utterance, "recognizer chain running");

        for recognizer in &self.recognizers {
            if let Some(result) = recognizer.recognize(context, utterance).await? {
                debug!(intent = %result.intent, "intent recognized");
                return Ok(Some(result));
            }
        }

        debug!("no intent recognized");

        Ok(None)
    }
}
