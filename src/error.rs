//! Error taxonomy for pipeline construction and execution.
//!
//! Two kinds of failure exist in this crate, and they are deliberately kept
//! apart:
//!
//! - [`ConfigurationError`]: a programmer error discovered while *composing* a
//!   pipeline (for example a recognizer chain with zero members). These are
//!   raised at construction time so a bad composition fails before the first
//!   utterance is processed.
//! - [`CapabilityError`]: a failure raised by an underlying capability (a
//!   recognizer calling out to an NLU service, a transform reading a resource).
//!   The pipeline never catches, retries, or rewrites these. The capability's
//!   own error is carried as the source and surfaces to the caller unchanged;
//!   a failing stage aborts the whole `process_utterance` call and partial
//!   pipeline progress is discarded.

use thiserror::Error;

/// Invalid pipeline composition, reported at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A recognizer chain must contain at least one recognizer; an empty
    /// chain could only ever return `None` and almost certainly indicates a
    /// wiring mistake.
    #[error("recognizer chain requires at least one recognizer")]
    EmptyRecognizerChain,
}

/// Failure propagated from an underlying recognizer or transform capability.
///
/// Construct one with [`CapabilityError::new`] from a concrete error value, or
/// [`CapabilityError::msg`] when only a message is available.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct CapabilityError {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl CapabilityError {
    /// Wrap a capability's error for propagation through the pipeline.
    pub fn new<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self { source: Box::new(source) }
    }

    /// Create an error from a bare message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self { source: Box::new(MessageError(message.into())) }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for CapabilityError {
    fn from(source: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self { source }
    }
}

#[derive(Debug)]
struct MessageError(String);

impl std::fmt::Display for MessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for MessageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_error_preserves_source_message() {
        let inner = std::io::Error::new(std::io::ErrorKind::TimedOut, "nlu service timed out");
        let err = CapabilityError::new(inner);
        assert_eq!(err.to_string(), "nlu service timed out");
    }

    #[test]
    fn configuration_error_display() {
        let err = ConfigurationError::EmptyRecognizerChain;
        assert_eq!(err.to_string(), "recognizer chain requires at least one recognizer");
    }
}
