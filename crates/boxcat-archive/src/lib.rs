//! Zip extraction into in-memory directory trees.
//!
//! Archives are decoded entirely into a [`boxcat_fs::MemoryDir`] so that nothing
//! caller-visible is touched until the whole archive has been read successfully.
//!
//! - `sanitize.rs` - entry path validation (zip-slip prevention)
//! - `extract.rs` - decoding and tree construction

pub use error::{Error, Result};
pub use extract::{ExtractReport, extract_zip};
pub use sanitize::sanitize_entry_path;

mod error;
mod extract;
mod sanitize;
