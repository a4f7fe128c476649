//! Build a JSONL SFT dataset from an image folder and a versioned prompt
//!
//! # Usage
//!
//! ```bash
//! sftkit-dataset \
//!   --image-dir ./images \
//!   --output-file ./sft_dataset.jsonl \
//!   --library ./pe.json \
//!   [--prompt-idx 0] \
//!   [--mode single|multi] \
//!   [--group-by prefix|suffix]
//! ```

use anyhow::Result;
use clap::Parser;
use sftkit_dataset::{build_multi, build_single, GroupMode};
use sftkit_prompt::PromptLibrary;
use sftkit_record::JsonlStore;
use std::path::PathBuf;

/// Build JSONL SFT records from an image folder and a prompt
#[derive(Parser, Debug)]
#[command(name = "sftkit-dataset")]
#[command(about = "Build a JSONL SFT dataset from images and a versioned prompt")]
struct Args {
    /// Folder containing the input images
    #[arg(long, value_name = "PATH", required = true)]
    image_dir: PathBuf,

    /// Output JSONL file (appended to, created if absent)
    #[arg(long, value_name = "PATH", default_value = "./sft_dataset.jsonl")]
    output_file: PathBuf,

    /// Prompt library JSON file
    #[arg(long, value_name = "PATH", default_value = "./pe.json")]
    library: PathBuf,

    /// Index of the prompt version to use
    #[arg(long, default_value = "0")]
    prompt_idx: usize,

    /// Build mode: single (one image per record) or multi (grouped images)
    #[arg(long, default_value = "single")]
    mode: String,

    /// Grouping key for multi mode: prefix or suffix of the file stem
    #[arg(long, default_value = "prefix")]
    group_by: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let library = PromptLibrary::load(&args.library)?;
    let prompt = library.get(args.prompt_idx)?;

    let store = JsonlStore::new(&args.output_file);
    println!(
        "Building SFT dataset from {:?} into {:?} (prompt{})...",
        args.image_dir, args.output_file, args.prompt_idx
    );

    let report = match args.mode.as_str() {
        "single" => build_single(&args.image_dir, prompt, &store)?,
        "multi" => {
            let group_mode = match args.group_by.as_str() {
                "prefix" => GroupMode::Prefix,
                "suffix" => GroupMode::Suffix,
                other => {
                    anyhow::bail!("Unknown group-by: {}. Available: prefix, suffix", other);
                }
            };
            build_multi(&args.image_dir, prompt, &store, group_mode)?
        }
        other => {
            anyhow::bail!("Unknown mode: {}. Available: single, multi", other);
        }
    };

    println!("\n=== Build Summary ===");
    println!("  records written:    {}", report.written);
    println!("  skipped (existing): {}", report.skipped_existing);
    println!("  skipped (not image): {}", report.skipped_non_image);

    Ok(())
}
