//! Image scanning, grouping, and record construction

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sftkit_record::{JsonlStore, SftRecord};

/// Extensions treated as images (matched case-insensitively).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// How multi-image groups are keyed: by the first or last `_`-separated
/// component of the file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    Prefix,
    Suffix,
}

/// Outcome of one builder run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records appended to the store.
    pub written: usize,
    /// Ids (images or groups) skipped because they were already present.
    pub skipped_existing: usize,
    /// Directory entries skipped for not being image files.
    pub skipped_non_image: usize,
}

/// List image files in `dir`, sorted by file name.
///
/// Returns the image paths and the count of entries skipped for not being
/// image files. Sorting keeps rebuild output stable across runs.
pub fn scan_images(dir: &Path) -> Result<(Vec<PathBuf>, usize)> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read image dir: {:?}", dir))?;

    let mut images = Vec::new();
    let mut skipped = 0;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {:?}", dir))?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        } else {
            skipped += 1;
        }
    }
    images.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    Ok((images, skipped))
}

/// One record per image; the file stem is the record id.
pub fn build_single(image_dir: &Path, prompt: &str, store: &JsonlStore) -> Result<BuildReport> {
    let (images, skipped_non_image) = scan_images(image_dir)?;
    let mut existing = store.existing_ids()?;

    let mut report = BuildReport {
        skipped_non_image,
        ..Default::default()
    };
    let mut new_records = Vec::new();
    for path in &images {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            report.skipped_non_image += 1;
            continue;
        };
        if existing.contains(stem) {
            report.skipped_existing += 1;
            continue;
        }
        let abs = absolute_posix(path)?;
        existing.insert(stem.to_string());
        new_records.push(SftRecord::new(stem, vec![abs], prompt));
    }

    report.written = store.append(&new_records)?;
    Ok(report)
}

/// One record per filename group; the group key is the record id.
///
/// Groups are emitted in sorted key order, and every image in a group is
/// listed in file-name order.
pub fn build_multi(
    image_dir: &Path,
    prompt: &str,
    store: &JsonlStore,
    mode: GroupMode,
) -> Result<BuildReport> {
    let (images, skipped_non_image) = scan_images(image_dir)?;
    let existing = store.existing_ids()?;

    let mut report = BuildReport {
        skipped_non_image,
        ..Default::default()
    };
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in &images {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            report.skipped_non_image += 1;
            continue;
        };
        let abs = absolute_posix(path)?;
        groups.entry(group_key(stem, mode)).or_default().push(abs);
    }

    let mut new_records = Vec::new();
    for (key, paths) in groups {
        if existing.contains(&key) {
            report.skipped_existing += 1;
            continue;
        }
        new_records.push(SftRecord::new(key, paths, prompt));
    }

    report.written = store.append(&new_records)?;
    Ok(report)
}

/// Group key for a file stem: first or last `_`-separated component.
/// A stem without `_` is its own group either way.
fn group_key(stem: &str, mode: GroupMode) -> String {
    let part = match mode {
        GroupMode::Prefix => stem.split('_').next(),
        GroupMode::Suffix => stem.split('_').next_back(),
    };
    part.unwrap_or(stem).to_string()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Absolute path with `/` separators, as stored in records.
fn absolute_posix(path: &Path) -> Result<String> {
    let abs = std::path::absolute(path)
        .with_context(|| format!("Failed to absolutize path: {:?}", path))?;
    Ok(abs.to_string_lossy().replace('\\', "/"))
}
