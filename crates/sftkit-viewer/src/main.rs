//! Browse a JSONL result file, or compare two, in the browser
//!
//! # Usage
//!
//! ```bash
//! # browse one result file
//! sftkit-viewer ./results.jsonl
//!
//! # compare two result files record-by-record (matched on id)
//! sftkit-viewer --compare ./run_a.jsonl ./run_b.jsonl
//! ```
//!
//! The server binds to 127.0.0.1 only; open the printed URL and navigate
//! with A (previous) / D (next).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sftkit_viewer::{serve, ViewerState};

/// Serve a local web viewer for JSONL SFT results
#[derive(Parser, Debug)]
#[command(name = "sftkit-viewer")]
#[command(about = "Browse or compare JSONL SFT results in the browser")]
struct Args {
    /// JSONL result file to browse
    #[arg(value_name = "JSONL", required_unless_present = "compare")]
    jsonl: Option<PathBuf>,

    /// Compare two JSONL result files side by side
    #[arg(long, num_args = 2, value_names = ["FILE_A", "FILE_B"], conflicts_with = "jsonl")]
    compare: Option<Vec<PathBuf>>,

    /// Port to bind on 127.0.0.1 (0 = pick an ephemeral port)
    #[arg(long, default_value = "0")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let state = match &args.compare {
        Some(files) => ViewerState::compare(&files[0], &files[1])?,
        None => {
            let path = args.jsonl.as_ref().context("A JSONL file is required")?;
            ViewerState::single(path)?
        }
    };

    println!(
        "Loaded {} records ({} lines skipped)",
        state.len(),
        state.skipped
    );

    serve(Arc::new(state), args.port).await
}
