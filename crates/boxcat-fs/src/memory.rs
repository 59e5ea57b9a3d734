use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Directory, Error, Result, validate_name};

/// Directory tree held entirely in memory.
///
/// Used for freshly extracted archives before they are copied anywhere visible.
pub struct MemoryDir {
    name:  String,
    inner: Mutex<Entries>,
}

#[derive(Default)]
struct Entries {
    files: BTreeMap<String, Vec<u8>>,
    dirs:  BTreeMap<String, Arc<MemoryDir>>,
}

impl MemoryDir {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name:  name.into(),
            inner: Mutex::new(Entries::default()),
        })
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_empty(&self) -> bool {
        let entries = self.entries();
        entries.files.is_empty() && entries.dirs.is_empty()
    }

    /// Typed access to a child, for callers that need to keep building the tree.
    pub fn memory_subdirectory(&self, name: &str) -> Option<Arc<MemoryDir>> {
        self.entries().dirs.get(name).cloned()
    }

    pub fn create_memory_subdirectory(&self, name: &str) -> Result<Arc<MemoryDir>> {
        validate_name(name)?;
        let mut entries = self.entries();
        if entries.files.contains_key(name) {
            return Err(Error::KindConflict {
                name: name.to_string(),
            });
        }
        Ok(entries
            .dirs
            .entry(name.to_string())
            .or_insert_with(|| MemoryDir::new(name))
            .clone())
    }
}

impl Directory for MemoryDir {
    fn name(&self) -> String { self.name.clone() }

    fn subdirectory_names(&self) -> Result<Vec<String>> {
        Ok(self.entries().dirs.keys().cloned().collect())
    }

    fn file_names(&self) -> Result<Vec<String>> {
        Ok(self.entries().files.keys().cloned().collect())
    }

    fn subdirectory(&self, name: &str) -> Option<Arc<dyn Directory>> {
        self.memory_subdirectory(name)
            .map(|dir| dir as Arc<dyn Directory>)
    }

    fn create_subdirectory(&self, name: &str) -> Result<Arc<dyn Directory>> {
        self.create_memory_subdirectory(name)
            .map(|dir| dir as Arc<dyn Directory>)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        self.entries()
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        validate_name(name)?;
        let mut entries = self.entries();
        if entries.dirs.contains_key(name) {
            return Err(Error::KindConflict {
                name: name.to_string(),
            });
        }
        entries.files.insert(name.to_string(), content.to_vec());
        Ok(())
    }

    fn delete_subdirectory_recursive(&self, name: &str) -> Result<()> {
        self.entries()
            .dirs
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_and_dirs_are_listed_sorted() {
        let root = MemoryDir::new("root");
        root.write_file("b.bin", b"b").unwrap();
        root.write_file("a.bin", b"a").unwrap();
        root.create_subdirectory("zeta").unwrap();
        root.create_subdirectory("alpha").unwrap();

        assert_eq!(root.file_names().unwrap(), vec!["a.bin", "b.bin"]);
        assert_eq!(root.subdirectory_names().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn create_subdirectory_is_idempotent() {
        let root = MemoryDir::new("root");
        let first = root.create_subdirectory("data").unwrap();
        first.write_file("x", b"1").unwrap();
        let second = root.create_subdirectory("data").unwrap();
        assert_eq!(second.read_file("x").unwrap(), b"1");
    }

    #[test]
    fn file_and_directory_names_do_not_collide() {
        let root = MemoryDir::new("root");
        root.write_file("entry", b"").unwrap();
        assert!(matches!(root.create_subdirectory("entry"), Err(Error::KindConflict { .. })));
        root.create_subdirectory("dir").unwrap();
        assert!(matches!(root.write_file("dir", b""), Err(Error::KindConflict { .. })));
    }

    #[test]
    fn delete_missing_subdirectory_fails() {
        let root = MemoryDir::new("root");
        assert!(matches!(
            root.delete_subdirectory_recursive("nope"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn delete_removes_whole_subtree() {
        let root = MemoryDir::new("root");
        let sub = root.create_memory_subdirectory("sub").unwrap();
        sub.create_subdirectory("deeper").unwrap();
        root.delete_subdirectory_recursive("sub").unwrap();
        assert!(root.subdirectory("sub").is_none());
        assert!(root.is_empty());
    }
}
