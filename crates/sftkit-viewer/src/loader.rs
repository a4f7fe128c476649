//! Load JSONL result files into view state

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;
use sftkit_record::{JsonlStore, SftRecord};

/// Placeholder shown when a record has no human turn.
pub const MISSING_HUMAN: &str = "** missing human prompt **";
/// Placeholder shown when a record has no assistant turn.
pub const MISSING_ASSISTANT: &str = "** missing assistant reply **";

/// What the viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Single,
    Compare,
}

/// One record of a single result file.
#[derive(Debug, Clone, Serialize)]
pub struct SingleView {
    pub id: String,
    pub image: Vec<String>,
    pub human: String,
    pub assistant: String,
}

/// One id common to both files of a comparison. The image list comes from
/// file A (both files describe the same inputs).
#[derive(Debug, Clone, Serialize)]
pub struct CompareView {
    pub id: String,
    pub image: Vec<String>,
    pub answer_a: String,
    pub answer_b: String,
}

/// Loaded records, per mode.
#[derive(Debug)]
pub enum Views {
    Single(Vec<SingleView>),
    Compare(Vec<CompareView>),
}

impl Views {
    pub fn len(&self) -> usize {
        match self {
            Views::Single(v) => v.len(),
            Views::Compare(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the HTTP handlers need, shared via `Arc`.
#[derive(Debug)]
pub struct ViewerState {
    pub mode: ViewMode,
    /// File name (not full path) of the primary file, for pane titles.
    pub file_a: String,
    /// File name of the second file in compare mode.
    pub file_b: Option<String>,
    pub views: Views,
    /// Lines skipped across all source files (unparseable or incomplete).
    pub skipped: usize,
}

impl ViewerState {
    /// Load a single result file for browsing.
    ///
    /// Errors if the file is missing or contains no usable records.
    pub fn single(path: &Path) -> Result<Self> {
        let outcome = JsonlStore::new(path).load()?;
        if outcome.records.is_empty() {
            bail!("No usable records in {:?}", path);
        }

        let views = outcome
            .records
            .into_iter()
            .map(|record| SingleView {
                human: turn_text(&record, 0, MISSING_HUMAN),
                assistant: turn_text(&record, 1, MISSING_ASSISTANT),
                id: record.id,
                image: record.image,
            })
            .collect();

        Ok(Self {
            mode: ViewMode::Single,
            file_a: display_name(path),
            file_b: None,
            views: Views::Single(views),
            skipped: outcome.skipped,
        })
    }

    /// Load two result files and merge records sharing an `id`, sorted by id.
    ///
    /// Refuses to compare a file against itself, and errors if the files have
    /// no ids in common. A record missing its assistant turn on either side
    /// is dropped from the comparison and counted as skipped.
    pub fn compare(path_a: &Path, path_b: &Path) -> Result<Self> {
        if is_same_file(path_a, path_b) {
            bail!("Cannot compare a file against itself: {:?}", path_a);
        }

        let outcome_a = JsonlStore::new(path_a).load()?;
        let outcome_b = JsonlStore::new(path_b).load()?;
        let mut skipped = outcome_a.skipped + outcome_b.skipped;

        let map_a = by_id(outcome_a.records);
        let map_b = by_id(outcome_b.records);

        let mut common: Vec<&String> = map_a.keys().filter(|id| map_b.contains_key(*id)).collect();
        common.sort();

        let mut views = Vec::with_capacity(common.len());
        for id in common {
            let record_a = &map_a[id];
            let record_b = &map_b[id];
            let (Some(answer_a), Some(answer_b)) = (
                record_a.conversation.get(1).map(|t| t.value.clone()),
                record_b.conversation.get(1).map(|t| t.value.clone()),
            ) else {
                skipped += 1;
                continue;
            };
            views.push(CompareView {
                id: id.clone(),
                image: record_a.image.clone(),
                answer_a,
                answer_b,
            });
        }

        if views.is_empty() {
            bail!(
                "{:?} and {:?} have no comparable records in common",
                path_a,
                path_b
            );
        }

        Ok(Self {
            mode: ViewMode::Compare,
            file_a: display_name(path_a),
            file_b: Some(display_name(path_b)),
            views: Views::Compare(views),
            skipped,
        })
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Image `n` of record `idx`, if both exist. Images are only ever
    /// addressed by index; the HTTP surface never accepts a path.
    pub fn image_path(&self, idx: usize, n: usize) -> Option<&str> {
        let images = match &self.views {
            Views::Single(v) => &v.get(idx)?.image,
            Views::Compare(v) => &v.get(idx)?.image,
        };
        images.get(n).map(|s| s.as_str())
    }
}

fn turn_text(record: &SftRecord, idx: usize, placeholder: &str) -> String {
    record
        .conversation
        .get(idx)
        .map(|t| t.value.clone())
        .unwrap_or_else(|| placeholder.to_string())
}

fn by_id(records: Vec<SftRecord>) -> HashMap<String, SftRecord> {
    // Later lines win on duplicate ids, matching append-order semantics.
    records.into_iter().map(|r| (r.id.clone(), r)).collect()
}

/// Lexical equality misses spellings like `./run.jsonl` vs `run.jsonl`, so
/// compare canonical paths when both files resolve.
fn is_same_file(path_a: &Path, path_b: &Path) -> bool {
    match (path_a.canonicalize(), path_b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => path_a == path_b,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl ViewerState {
    /// Pane titles for the page, per mode.
    pub fn pane_titles(&self) -> (String, String) {
        match self.mode {
            ViewMode::Single => ("Human prompt".to_string(), "Assistant reply".to_string()),
            ViewMode::Compare => (
                format!("File A: {}", self.file_a),
                format!(
                    "File B: {}",
                    self.file_b.as_deref().unwrap_or("(second file)")
                ),
            ),
        }
    }
}
