//! Local browser viewer for JSONL SFT results
//!
//! Serves a loopback web page for stepping through a result file (image on
//! top, human prompt and assistant reply below) or comparing two result
//! files record-by-record matched on `id`. Navigation is A/D, as in the
//! review tooling this replaces.

pub mod loader;
pub mod server;

pub use loader::{CompareView, SingleView, ViewMode, ViewerState, Views};
pub use server::{router, serve};
