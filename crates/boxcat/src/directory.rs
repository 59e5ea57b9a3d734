use std::path::PathBuf;
use std::sync::Arc;

use boxcat_fetch::format_id;
use boxcat_fs::{Directory, DiskDir};
use tracing::warn;

/// Resolves the content directory a title's data is synchronized into.
pub trait DirectoryGetter: Send + Sync {
    fn directory(&self, title_id: u64) -> Option<Arc<dyn Directory>>;
}

impl<F> DirectoryGetter for F
where
    F: Fn(u64) -> Option<Arc<dyn Directory>> + Send + Sync,
{
    fn directory(&self, title_id: u64) -> Option<Arc<dyn Directory>> { self(title_id) }
}

/// One on-disk directory per title, `<root>/<TID>`, created on demand.
#[derive(Clone, Debug)]
pub struct DiskDirectoryGetter {
    root: PathBuf,
}

impl DiskDirectoryGetter {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

impl DirectoryGetter for DiskDirectoryGetter {
    fn directory(&self, title_id: u64) -> Option<Arc<dyn Directory>> {
        match DiskDir::open(self.root.join(format_id(title_id))) {
            Ok(dir) => Some(dir as Arc<dyn Directory>),
            Err(e) => {
                warn!(title_id = %format_id(title_id), error = %e, "cannot open content directory");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use boxcat_fs::MemoryDir;

    use super::*;

    #[test]
    fn closures_are_getters() {
        let dir = MemoryDir::new("content");
        let getter = move |title_id: u64| {
            (title_id == 7).then(|| Arc::clone(&dir) as Arc<dyn Directory>)
        };
        assert!(getter.directory(7).is_some());
        assert!(getter.directory(8).is_none());
    }

    #[test]
    fn disk_getter_creates_per_title_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let getter = DiskDirectoryGetter::new(tmp.path());
        let dir = getter.directory(0x1337).unwrap();
        dir.write_file("a", b"1").unwrap();
        assert!(tmp.path().join("0000000000001337").join("a").is_file());
    }
}
