//! Integration tests for result-file loading and compare merging

use anyhow::Result;
use sftkit_viewer::{ViewMode, ViewerState, Views};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_jsonl(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, lines.join("\n") + "\n").expect("Failed to write test file");
    path
}

fn record_line(id: &str, human: &str, assistant: &str) -> String {
    format!(
        r#"{{"id": "{id}", "image": ["/data/{id}.jpg"], "conversation": [{{"from": "human", "value": "{human}"}}, {{"from": "assistant", "value": "{assistant}"}}]}}"#
    )
}

#[test]
fn test_single_load_basic() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a = record_line("a", "prompt", "reply a");
    let b = record_line("b", "prompt", "reply b");
    let path = write_jsonl(&dir, "results.jsonl", &[&a, &b]);

    let state = ViewerState::single(&path)?;
    assert_eq!(state.mode, ViewMode::Single);
    assert_eq!(state.len(), 2);
    assert_eq!(state.file_a, "results.jsonl");
    assert!(state.file_b.is_none());

    let Views::Single(views) = &state.views else {
        panic!("expected single views");
    };
    assert_eq!(views[0].id, "a");
    assert_eq!(views[0].human, "prompt");
    assert_eq!(views[0].assistant, "reply a");
    assert_eq!(views[0].image, vec!["/data/a.jpg"]);
    Ok(())
}

#[test]
fn test_single_load_skips_bad_lines() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let good = record_line("good", "p", "r");
    let path = write_jsonl(&dir, "results.jsonl", &[&good, "not json", ""]);

    let state = ViewerState::single(&path)?;
    assert_eq!(state.len(), 1);
    assert_eq!(state.skipped, 1);
    Ok(())
}

#[test]
fn test_single_missing_turns_use_placeholders() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_jsonl(
        &dir,
        "results.jsonl",
        &[r#"{"id": "bare", "image": [], "conversation": []}"#],
    );

    let state = ViewerState::single(&path)?;
    let Views::Single(views) = &state.views else {
        panic!("expected single views");
    };
    assert_eq!(views[0].human, "** missing human prompt **");
    assert_eq!(views[0].assistant, "** missing assistant reply **");
    Ok(())
}

#[test]
fn test_single_empty_file_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_jsonl(&dir, "results.jsonl", &["junk line"]);
    assert!(ViewerState::single(&path).is_err());
    Ok(())
}

#[test]
fn test_single_missing_file_errors() {
    assert!(ViewerState::single(std::path::Path::new("/nonexistent.jsonl")).is_err());
}

#[test]
fn test_compare_merges_common_ids_sorted() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a1 = record_line("z", "p", "z from a");
    let a2 = record_line("m", "p", "m from a");
    let a3 = record_line("only_a", "p", "x");
    let b1 = record_line("m", "p", "m from b");
    let b2 = record_line("z", "p", "z from b");
    let path_a = write_jsonl(&dir, "run_a.jsonl", &[&a1, &a2, &a3]);
    let path_b = write_jsonl(&dir, "run_b.jsonl", &[&b1, &b2]);

    let state = ViewerState::compare(&path_a, &path_b)?;
    assert_eq!(state.mode, ViewMode::Compare);
    assert_eq!(state.len(), 2);
    assert_eq!(state.file_b.as_deref(), Some("run_b.jsonl"));

    let Views::Compare(views) = &state.views else {
        panic!("expected compare views");
    };
    // Sorted by id, ids present in only one file dropped.
    assert_eq!(views[0].id, "m");
    assert_eq!(views[0].answer_a, "m from a");
    assert_eq!(views[0].answer_b, "m from b");
    assert_eq!(views[1].id, "z");
    // Image list comes from file A.
    assert_eq!(views[0].image, vec!["/data/m.jpg"]);
    Ok(())
}

#[test]
fn test_compare_refuses_same_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let line = record_line("a", "p", "r");
    let path = write_jsonl(&dir, "run.jsonl", &[&line]);
    assert!(ViewerState::compare(&path, &path).is_err());
    Ok(())
}

#[test]
fn test_compare_refuses_same_file_spelled_differently() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let line = record_line("a", "p", "r");
    let path = write_jsonl(&dir, "run.jsonl", &[&line]);
    let dotted = dir.path().join(".").join("run.jsonl");
    assert_ne!(path, dotted);
    assert!(ViewerState::compare(&path, &dotted).is_err());
    Ok(())
}

#[test]
fn test_compare_no_common_ids_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a = record_line("a", "p", "r");
    let b = record_line("b", "p", "r");
    let path_a = write_jsonl(&dir, "run_a.jsonl", &[&a]);
    let path_b = write_jsonl(&dir, "run_b.jsonl", &[&b]);
    assert!(ViewerState::compare(&path_a, &path_b).is_err());
    Ok(())
}

#[test]
fn test_compare_drops_records_without_reply() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a1 = record_line("ok", "p", "r");
    let a2 = r#"{"id": "short", "image": [], "conversation": [{"from": "human", "value": "p"}]}"#;
    let b1 = record_line("ok", "p", "r2");
    let b2 = record_line("short", "p", "full reply");
    let path_a = write_jsonl(&dir, "run_a.jsonl", &[&a1, a2]);
    let path_b = write_jsonl(&dir, "run_b.jsonl", &[&b1, &b2]);

    let state = ViewerState::compare(&path_a, &path_b)?;
    // "short" has no assistant turn on side A, so only "ok" is comparable.
    assert_eq!(state.len(), 1);
    assert_eq!(state.skipped, 1);
    Ok(())
}

#[test]
fn test_pane_titles_per_mode() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let line = record_line("a", "p", "r");
    let path_a = write_jsonl(&dir, "run_a.jsonl", &[&line]);
    let path_b = write_jsonl(&dir, "run_b.jsonl", &[&line]);

    let single = ViewerState::single(&path_a)?;
    assert_eq!(
        single.pane_titles(),
        ("Human prompt".to_string(), "Assistant reply".to_string())
    );

    let compare = ViewerState::compare(&path_a, &path_b)?;
    assert_eq!(
        compare.pane_titles(),
        (
            "File A: run_a.jsonl".to_string(),
            "File B: run_b.jsonl".to_string()
        )
    );
    Ok(())
}

#[test]
fn test_image_path_lookup_bounds() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let line = record_line("a", "p", "r");
    let path = write_jsonl(&dir, "results.jsonl", &[&line]);

    let state = ViewerState::single(&path)?;
    assert_eq!(state.image_path(0, 0), Some("/data/a.jpg"));
    assert!(state.image_path(0, 1).is_none());
    assert!(state.image_path(5, 0).is_none());
    Ok(())
}
