//! Dataset construction: image folders + a prompt → JSONL training records
//!
//! Two modes mirror how capture pipelines name their files:
//! - single: one record per image, id = file stem
//! - multi: images grouped by a shared stem prefix or suffix, one record
//!   per group, id = group key
//!
//! Builders append to the output store and skip ids that already exist, so
//! re-running over a growing image folder only adds the new examples.

pub mod builder;

pub use builder::{build_multi, build_single, scan_images, BuildReport, GroupMode};
