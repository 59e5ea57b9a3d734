use std::io::{Cursor, Read};
use std::sync::Arc;

use boxcat_fs::{Directory, MemoryDir};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sanitize::sanitize_entry_path;

/// Name given to the root of every extracted tree.
pub const EXTRACTED_ROOT: &str = "extracted";

/// Outcome of a successful extraction.
pub struct ExtractReport {
    pub root:        Arc<MemoryDir>,
    pub file_count:  usize,
    pub total_bytes: u64,
}

/// Decode `bytes` as a zip archive into a fresh in-memory tree.
///
/// Extraction is all-or-nothing: the first bad entry fails the whole archive.
pub fn extract_zip(bytes: &[u8]) -> Result<ExtractReport> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(Error::Corrupted)?;
    let root = MemoryDir::new(EXTRACTED_ROOT);
    let mut file_count = 0;
    let mut total_bytes = 0u64;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(Error::Corrupted)?;
        let raw_name = file.name().to_string();
        let mut parts = sanitize_entry_path(&raw_name)?;

        if file.is_dir() {
            walk_to(&root, &parts)?;
            continue;
        }

        let Some(file_name) = parts.pop() else {
            continue;
        };
        let parent = walk_to(&root, &parts)?;

        let mut content = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut content)
            .map_err(|e| Error::ExtractionFailed {
                path:   raw_name.clone(),
                source: e,
            })?;

        total_bytes += content.len() as u64;
        file_count += 1;
        parent.write_file(&file_name, &content)?;
    }

    debug!(file_count, total_bytes, "extracted zip archive");

    Ok(ExtractReport {
        root,
        file_count,
        total_bytes,
    })
}

fn walk_to(root: &Arc<MemoryDir>, parts: &[String]) -> Result<Arc<MemoryDir>> {
    let mut current = Arc::clone(root);
    for part in parts {
        current = current.create_memory_subdirectory(part)?;
    }
    Ok(current)
}
