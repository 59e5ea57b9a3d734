use std::sync::Arc;

use crate::{Error, Result};

/// Handle to one directory of a virtual tree.
///
/// Lookups that find nothing return `None`; everything that touches storage
/// returns a [`Result`].
pub trait Directory: Send + Sync {
    fn name(&self) -> String;

    /// Names of the immediate subdirectories, sorted.
    fn subdirectory_names(&self) -> Result<Vec<String>>;

    /// Names of the immediate files, sorted.
    fn file_names(&self) -> Result<Vec<String>>;

    fn subdirectory(&self, name: &str) -> Option<Arc<dyn Directory>>;

    /// Open the named subdirectory, creating it if absent.
    fn create_subdirectory(&self, name: &str) -> Result<Arc<dyn Directory>>;

    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    /// Create or wholly replace the named file.
    fn write_file(&self, name: &str, content: &[u8]) -> Result<()>;

    fn delete_subdirectory_recursive(&self, name: &str) -> Result<()>;
}

/// Entry names are single path components.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
