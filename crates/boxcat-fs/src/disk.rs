use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::{AtomicWriteOptions, Directory, Error, Result, atomic_read, atomic_write, validate_name};

/// Directory rooted at a real filesystem path.
#[derive(Clone, Debug)]
pub struct DiskDir {
    root: PathBuf,
}

impl DiskDir {
    /// Open `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Arc<Self>> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| Error::Write {
            path: root.clone(),
            source: e,
        })?;
        Ok(Arc::new(Self { root }))
    }

    pub fn path(&self) -> &Path { &self.root }

    fn child(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn list(&self, want_dirs: bool) -> Result<Vec<String>> {
        let read_err = |e: io::Error| Error::Read {
            path: self.root.clone(),
            source: e,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let file_type = entry.file_type().map_err(read_err)?;
            if file_type.is_dir() != want_dirs {
                continue;
            }
            // Names that are not valid UTF-8 cannot be addressed through `Directory`.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

impl Directory for DiskDir {
    fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn subdirectory_names(&self) -> Result<Vec<String>> { self.list(true) }

    fn file_names(&self) -> Result<Vec<String>> { self.list(false) }

    fn subdirectory(&self, name: &str) -> Option<Arc<dyn Directory>> {
        let path = self.child(name).ok()?;
        path.is_dir()
            .then(|| Arc::new(DiskDir { root: path }) as Arc<dyn Directory>)
    }

    fn create_subdirectory(&self, name: &str) -> Result<Arc<dyn Directory>> {
        let path = self.child(name)?;
        if path.exists() && !path.is_dir() {
            return Err(Error::KindConflict {
                name: name.to_string(),
            });
        }
        DiskDir::open(path).map(|dir| dir as Arc<dyn Directory>)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> { atomic_read(self.child(name)?) }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.child(name)?;
        if path.is_dir() {
            return Err(Error::KindConflict {
                name: name.to_string(),
            });
        }
        atomic_write(path, content, AtomicWriteOptions::new())
    }

    fn delete_subdirectory_recursive(&self, name: &str) -> Result<()> {
        let path = self.child(name)?;
        debug!(path = %path.display(), "deleting directory tree");
        fs::remove_dir_all(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                name: name.to_string(),
            },
            _ => Error::Delete { path, source: e },
        })
    }
}
