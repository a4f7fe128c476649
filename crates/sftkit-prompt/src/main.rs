//! Save a drafted prompt text file into the versioned prompt library
//!
//! # Usage
//!
//! ```bash
//! sftkit-prompt --input-file ./prompt_text.txt --library ./pe.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sftkit_prompt::PromptLibrary;
use std::path::PathBuf;

/// Append a prompt text file to the library as the next version
#[derive(Parser, Debug)]
#[command(name = "sftkit-prompt")]
#[command(about = "Save prompt text into a versioned JSON library")]
struct Args {
    /// Plain-text file containing the prompt to save
    #[arg(long, value_name = "PATH")]
    input_file: PathBuf,

    /// Prompt library JSON file (created if absent)
    #[arg(long, value_name = "PATH")]
    library: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let prompt_text = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to read prompt file: {:?}", args.input_file))?;

    let mut library = PromptLibrary::load_or_default(&args.library);

    let idx = library.add(&prompt_text);
    library.save(&args.library)?;

    println!("Saved prompt{} to {:?}", idx, args.library);
    Ok(())
}
