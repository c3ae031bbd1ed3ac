//! Entity model shared by every pipeline stage.
//!
//! An [`Entity`] is a typed fragment of information extracted from an
//! utterance. The model is a tagged sum: each variant carries a value whose
//! shape matches its discriminator, and consumers branch with exhaustive
//! `match` rather than probing for properties. The serialized form keeps the
//! conventional wire layout (a `type` tag plus camelCase fields) so results
//! can be diffed and replayed by outside tooling.
//!
//! Entities are plain values. A transform step that wants to change one
//! builds a new value; nothing in this module is shared or mutated across
//! utterances.

use serde::{Deserialize, Serialize};

/// Byte span of an entity in the source utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtteranceOffsets {
    /// Start byte index (inclusive).
    pub start_index: usize,
    /// End byte index (exclusive).
    pub end_index: usize,
}

/// A typed entity recognized in (or derived from) an utterance.
///
/// `Composite` owns its children exclusively; the structure is a tree and
/// sibling order is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Entity {
    /// A marker entity with no attached value.
    Simple {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        utterance_offsets: Option<UtteranceOffsets>,
    },
    /// A free-text value.
    String {
        name: String,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        utterance_offsets: Option<UtteranceOffsets>,
    },
    /// A numeric value.
    Number {
        name: String,
        value: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        utterance_offsets: Option<UtteranceOffsets>,
    },
    /// An entity grouping an ordered sequence of child entities.
    Composite {
        name: String,
        children: Vec<Entity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        utterance_offsets: Option<UtteranceOffsets>,
    },
}

impl Entity {
    /// The entity's name, regardless of variant.
    pub fn name(&self) -> &str {
        match self {
            Entity::Simple { name, .. }
            | Entity::String { name, .. }
            | Entity::Number { name, .. }
            | Entity::Composite { name, .. } => name,
        }
    }

    /// The entity's span in the source utterance, when known.
    pub fn utterance_offsets(&self) -> Option<UtteranceOffsets> {
        match self {
            Entity::Simple { utterance_offsets, .. }
            | Entity::String { utterance_offsets, .. }
            | Entity::Number { utterance_offsets, .. }
            | Entity::Composite { utterance_offsets, .. } => *utterance_offsets,
        }
    }

    /// The string value carried by `String` entities.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Entity::String { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The children of `Composite` entities.
    pub fn children(&self) -> Option<&[Entity]> {
        match self {
            Entity::Composite { children, .. } => Some(children),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_composite() -> Entity {
        Entity::Composite {
            name: "order-line".to_string(),
            children: vec![
                Entity::Number { name: "quantity".to_string(), value: 2.0, utterance_offsets: None },
                Entity::String {
                    name: "item".to_string(),
                    value: "hamburger".to_string(),
                    utterance_offsets: Some(UtteranceOffsets { start_index: 10, end_index: 19 }),
                },
            ],
            utterance_offsets: None,
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let entity = Entity::String {
            name: "item".to_string(),
            value: "hamburger".to_string(),
            utterance_offsets: None,
        };

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["name"], "item");
        assert_eq!(json["value"], "hamburger");
        assert!(json.get("utteranceOffsets").is_none());
    }

    #[test]
    fn offsets_use_camel_case_keys() {
        let entity = Entity::Simple {
            name: "greeting".to_string(),
            utterance_offsets: Some(UtteranceOffsets { start_index: 0, end_index: 5 }),
        };

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["utteranceOffsets"]["startIndex"], 0);
        assert_eq!(json["utteranceOffsets"]["endIndex"], 5);
    }

    #[test]
    fn composite_round_trips_without_loss() {
        let entity = sample_composite();
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();

        assert_eq!(back, entity);

        let children = back.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].as_str(), Some("hamburger"));
        assert_eq!(
            children[1].utterance_offsets(),
            Some(UtteranceOffsets { start_index: 10, end_index: 19 })
        );
    }

    #[test]
    fn name_is_uniform_across_variants() {
        assert_eq!(sample_composite().name(), "order-line");
        let number = Entity::Number { name: "count".to_string(), value: 3.0, utterance_offsets: None };
        assert_eq!(number.name(), "count");
    }
}
