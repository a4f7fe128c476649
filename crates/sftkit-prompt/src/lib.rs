//! Versioned prompt library for SFT dataset construction
//!
//! Prompts are drafted in plain text files, then saved into a JSON library
//! under sequential `prompt0`, `prompt1`, ... keys so every version stays
//! addressable by index. The dataset builder loads prompts back by index.

pub mod library;

pub use library::{PromptEntry, PromptLibrary};
