//! Shared record model and JSONL store for multimodal SFT datasets
//!
//! Every sftkit tool reads and writes the same JSONL record shape:
//!
//! ```json
//! {"id": "img_001", "image": ["/abs/path/img_001.jpg"], "conversation": [
//!     {"from": "human", "value": "Describe this image."},
//!     {"from": "assistant", "value": ""}
//! ]}
//! ```

pub mod record;
pub mod store;

pub use record::{SftRecord, Turn};
pub use store::{JsonlStore, LoadOutcome};
