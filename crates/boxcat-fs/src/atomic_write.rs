use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub sync: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Replace the file at `path` with `content`.
///
/// Missing parent directories are created. The bytes land in a sibling temporary
/// file that is renamed over `path`, so readers observe either the old file or the
/// complete new one.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| Error::NoParent {
            path: path.to_path_buf(),
        })?;

    fs::create_dir_all(parent).map_err(|e| Error::Write {
        path: parent.to_path_buf(),
        source: e,
    })?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".boxcat")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;

    let written = tmp.write_all(content).and_then(|()| {
        if options.sync {
            tmp.as_file().sync_all()
        } else {
            Ok(())
        }
    });
    written.map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;

    tmp.persist(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Returns whether a file was removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Delete {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
