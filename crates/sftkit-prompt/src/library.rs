//! JSON-backed prompt library with sequential version keys

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One saved prompt version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Free-form note, empty when saved from the CLI.
    pub comment: String,
    /// The prompt text exactly as written in the source file.
    pub prompt_text: String,
}

/// Ordered map of `prompt<N>` keys to prompt entries.
///
/// Keys that do not match `prompt<N>` are carried through untouched so a
/// hand-edited library never loses data on save.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    entries: Map<String, Value>,
}

impl PromptLibrary {
    /// Load a library, recovering a missing or broken file as empty.
    ///
    /// Saving a new prompt must never fail because the library on disk is
    /// absent or corrupt, so the CLI starts fresh instead. Callers that need
    /// the library to actually exist use [`load`].
    ///
    /// [`load`]: PromptLibrary::load
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(library) => library,
            Err(e) => {
                eprintln!("Warning: could not read prompt library ({e:#}), starting fresh");
                Self::default()
            }
        }
    }

    /// Load a library from a JSON file.
    ///
    /// Errors if the file is missing, unreadable, or not a JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt library: {:?}", path))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse prompt library: {:?}", path))?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => bail!("Prompt library {:?} is not a JSON object", path),
        }
    }

    /// Prompt text for `prompt<idx>`.
    pub fn get(&self, idx: usize) -> Result<&str> {
        let key = format!("prompt{idx}");
        let entry = self
            .entries
            .get(&key)
            .with_context(|| format!("No prompt with index {idx} in library"))?;
        entry
            .get("prompt_text")
            .and_then(|v| v.as_str())
            .with_context(|| format!("Entry {key:?} has no prompt_text field"))
    }

    /// Next free index: `max(N) + 1` over existing `prompt<N>` keys, or 0.
    pub fn next_index(&self) -> usize {
        self.entries
            .keys()
            .filter_map(|key| prompt_key_re().captures(key))
            .filter_map(|caps| caps[1].parse::<usize>().ok())
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    /// Insert `prompt_text` under the next free key with an empty comment.
    /// Returns the assigned index.
    pub fn add(&mut self, prompt_text: &str) -> usize {
        let idx = self.next_index();
        let entry = PromptEntry {
            comment: String::new(),
            prompt_text: prompt_text.to_string(),
        };
        self.entries.insert(
            format!("prompt{idx}"),
            serde_json::to_value(entry).unwrap_or(Value::Null),
        );
        idx
    }

    /// Write the library back as pretty-printed JSON (2-space indent).
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))
            .context("Failed to serialize prompt library")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write prompt library: {:?}", path))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compiled once; the pattern is a constant.
fn prompt_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^prompt(\d+)$").expect("constant prompt key pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_library_starts_at_index_zero() {
        let library = PromptLibrary::default();
        assert_eq!(library.next_index(), 0);
    }

    #[test]
    fn add_assigns_sequential_indices() {
        let mut library = PromptLibrary::default();
        assert_eq!(library.add("first"), 0);
        assert_eq!(library.add("second"), 1);
        assert_eq!(library.get(0).unwrap(), "first");
        assert_eq!(library.get(1).unwrap(), "second");
    }

    #[test]
    fn next_index_skips_over_gaps() {
        let mut library = PromptLibrary::default();
        library.entries.insert(
            "prompt7".into(),
            serde_json::json!({"comment": "", "prompt_text": "kept"}),
        );
        // Indices are never reused: next is max + 1, not the lowest gap.
        assert_eq!(library.next_index(), 8);
    }

    #[test]
    fn non_prompt_keys_do_not_affect_indexing() {
        let mut library = PromptLibrary::default();
        library.entries.insert("notes".into(), serde_json::json!("metadata"));
        library.entries.insert("prompt_draft".into(), serde_json::json!({}));
        assert_eq!(library.next_index(), 0);
        assert_eq!(library.add("text"), 0);
        // Unrelated keys survive.
        assert_eq!(library.len(), 3);
    }

    #[test]
    fn next_index_is_stable_across_repeated_calls() {
        let mut library = PromptLibrary::default();
        library.add("text");
        assert_eq!(library.next_index(), 1);
        assert_eq!(library.next_index(), 1);
    }

    #[test]
    fn get_missing_index_errors() {
        let library = PromptLibrary::default();
        assert!(library.get(3).is_err());
    }
}
