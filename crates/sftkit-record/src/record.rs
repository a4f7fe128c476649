//! SFT training record types
//!
//! Field names are part of the on-disk format shared with existing datasets
//! and must stay exactly `id` / `image` / `conversation` / `from` / `value`.

use serde::{Deserialize, Serialize};

/// Speaker tag for the prompt side of a conversation turn.
pub const FROM_HUMAN: &str = "human";
/// Speaker tag for the model side of a conversation turn.
pub const FROM_ASSISTANT: &str = "assistant";

/// One conversation turn in a training record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who is speaking: `"human"` or `"assistant"`.
    pub from: String,
    /// The turn text. Empty for the assistant slot of an unanswered record.
    pub value: String,
}

impl Turn {
    /// A human turn carrying `value`.
    pub fn human(value: impl Into<String>) -> Self {
        Self {
            from: FROM_HUMAN.to_string(),
            value: value.into(),
        }
    }

    /// An assistant turn carrying `value`.
    pub fn assistant(value: impl Into<String>) -> Self {
        Self {
            from: FROM_ASSISTANT.to_string(),
            value: value.into(),
        }
    }
}

/// One multimodal training example.
///
/// `image` holds absolute paths with `/` separators; a single-image record is
/// a one-element list so consumers handle both modes uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SftRecord {
    /// Unique record id (file stem in single mode, group key in multi mode).
    pub id: String,
    /// Absolute image paths belonging to this example.
    pub image: Vec<String>,
    /// Conversation turns, human prompt first.
    pub conversation: Vec<Turn>,
}

impl SftRecord {
    /// Build an unanswered record: a human turn with `prompt` followed by an
    /// empty assistant turn.
    pub fn new(id: impl Into<String>, images: Vec<String>, prompt: &str) -> Self {
        Self {
            id: id.into(),
            image: images,
            conversation: vec![Turn::human(prompt), Turn::assistant("")],
        }
    }

    /// Text of the first human turn, if present.
    pub fn human_text(&self) -> Option<&str> {
        self.conversation
            .iter()
            .find(|t| t.from == FROM_HUMAN)
            .map(|t| t.value.as_str())
    }

    /// Text of the first assistant turn, if present.
    pub fn assistant_text(&self) -> Option<&str> {
        self.conversation
            .iter()
            .find(|t| t.from == FROM_ASSISTANT)
            .map(|t| t.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_human_then_empty_assistant() {
        let record = SftRecord::new("img_001", vec!["/data/img_001.jpg".into()], "Describe this.");
        assert_eq!(record.conversation.len(), 2);
        assert_eq!(record.conversation[0].from, FROM_HUMAN);
        assert_eq!(record.conversation[0].value, "Describe this.");
        assert_eq!(record.conversation[1].from, FROM_ASSISTANT);
        assert_eq!(record.conversation[1].value, "");
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let record = SftRecord::new("a", vec!["/x/a.png".into()], "p");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":\"a\""));
        assert!(json.contains("\"image\":[\"/x/a.png\"]"));
        assert!(json.contains("\"conversation\""));
        assert!(json.contains("\"from\":\"human\""));
        assert!(json.contains("\"value\":\"p\""));
    }

    #[test]
    fn non_ascii_text_is_written_raw() {
        let record = SftRecord::new("a", vec![], "描述这张图片");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("描述这张图片"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn deserializes_existing_dataset_line() {
        let line = r#"{"id": "grp1", "image": ["/a/grp1_0.jpg", "/a/grp1_1.jpg"], "conversation": [{"from": "human", "value": "compare"}, {"from": "assistant", "value": "they differ"}]}"#;
        let record: SftRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.id, "grp1");
        assert_eq!(record.image.len(), 2);
        assert_eq!(record.human_text(), Some("compare"));
        assert_eq!(record.assistant_text(), Some("they differ"));
    }

    #[test]
    fn missing_turns_yield_none() {
        let record = SftRecord {
            id: "x".into(),
            image: vec![],
            conversation: vec![],
        };
        assert!(record.human_text().is_none());
        assert!(record.assistant_text().is_none());
    }
}
