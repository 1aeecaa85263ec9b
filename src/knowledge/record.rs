//! Intent record definitions - entries of the knowledge corpus.

use serde::{Deserialize, Serialize};

/// A single intent: regex patterns the user input may match, and the
/// candidate replies to answer with.
///
/// The wire field names (`patron`, `respuesta`, `context_set`) are fixed by
/// the corpus format and must round-trip exactly so pre-existing intent
/// files keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// Provenance label. Not unique; duplicate tags are allowed.
    #[serde(default)]
    pub tag: String,

    /// Ordered regex source strings. Within a record any match counts.
    #[serde(rename = "patron", default)]
    pub patterns: Vec<String>,

    /// Ordered candidate replies; one is chosen at random on a match.
    #[serde(rename = "respuesta", default)]
    pub replies: Vec<String>,

    /// Conversation-context placeholder. Always serialized, currently unused.
    #[serde(rename = "context_set", default)]
    pub context: String,
}

impl IntentRecord {
    /// Create a single-pattern record, the shape produced by learning.
    pub fn new(tag: impl Into<String>, pattern: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            patterns: vec![pattern.into()],
            replies: vec![reply.into()],
            context: String::new(),
        }
    }

    /// Number of replies stored on this record.
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }
}

/// Top-level corpus document: a single `intents` field.
///
/// A document without the field (or an empty object) decodes to an empty
/// corpus rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentFile {
    #[serde(default)]
    pub intents: Vec<IntentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let record = IntentRecord::new("greeting", "hello", "Hey!");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"tag\""));
        assert!(json.contains("\"patron\""));
        assert!(json.contains("\"respuesta\""));
        assert!(json.contains("\"context_set\""));
        assert!(!json.contains("\"patterns\""));
        assert!(!json.contains("\"replies\""));
    }

    #[test]
    fn test_decode_with_missing_fields() {
        let record: IntentRecord = serde_json::from_str(r#"{"tag":"partial"}"#).unwrap();
        assert_eq!(record.tag, "partial");
        assert!(record.patterns.is_empty());
        assert!(record.replies.is_empty());
        assert_eq!(record.context, "");
    }

    #[test]
    fn test_empty_document_decodes_to_empty_corpus() {
        let file: IntentFile = serde_json::from_str("{}").unwrap();
        assert!(file.intents.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let record = IntentRecord {
            tag: "greeting".to_string(),
            patterns: vec!["hi".to_string(), "hello".to_string()],
            replies: vec!["Hey!".to_string()],
            context: String::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: IntentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
