//! Regex-backed intent recognizer.
//!
//! A small, fully local recognizer for tables of utterance shapes. It is the
//! usual first member of a chain in front of a remote NLU recognizer, and it
//! is what the demo binary runs on.
//!
//! Patterns are tried in declaration order and the first one that matches
//! owns the utterance. Capture groups become `String` entities carrying their
//! byte offsets; named groups keep their name.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::entities::{Entity, UtteranceOffsets};
use crate::error::CapabilityError;
use crate::intent::{IntentRecognizer, RecognizedIntent};

/// One utterance shape mapped to an intent name.
#[derive(Debug)]
pub struct IntentPattern {
    regex: Regex,
    intent: String,
}

impl IntentPattern {
    pub fn new(regex: Regex, intent: impl Into<String>) -> Self {
        Self { regex, intent: intent.into() }
    }
}

/// First-match-wins regex recognizer.
///
/// An empty pattern table is valid and simply never recognizes anything,
/// which lets callers assemble tables from configuration without a special
/// case.
#[derive(Debug)]
pub struct PatternRecognizer {
    patterns: Vec<IntentPattern>,
}

impl PatternRecognizer {
    pub fn new(patterns: Vec<IntentPattern>) -> Self {
        debug!(count = patterns.len(), "created pattern recognizer");
        Self { patterns }
    }
}

#[async_trait]
impl<C> IntentRecognizer<C, Entity> for PatternRecognizer
where
    C: Send + Sync,
{
    async fn recognize(
        &self,
        _context: &C,
        utterance: &str,
    ) -> Result<Option<RecognizedIntent<Entity>>, CapabilityError> {
        for pattern in &self.patterns {
            let Some(captures) = pattern.regex.captures(utterance) else {
                continue;
            };

            let names: Vec<Option<&str>> = pattern.regex.capture_names().collect();

            // Group 0 is the whole match, not an entity.
            let entities = captures
                .iter()
                .enumerate()
                .skip(1)
                .filter_map(|(index, group)| {
                    let group = group?;
                    let name = match names.get(index).copied().flatten() {
                        Some(name) => name.to_string(),
                        None => format!("capture-{index}"),
                    };
                    Some(Entity::String {
                        name,
                        value: group.as_str().to_string(),
                        utterance_offsets: Some(UtteranceOffsets {
                            start_index: group.start(),
                            end_index: group.end(),
                        }),
                    })
                })
                .collect();

            debug!(intent = %pattern.intent, "pattern matched utterance");

            return Ok(Some(RecognizedIntent::new(utterance, pattern.intent.clone(), entities)));
        }

        Ok(None)
    }
}
