use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Split an archive entry path into plain directory components.
///
/// Absolute paths and any `..` are rejected; `.` components are dropped. An entry
/// that names only the archive root yields an empty list.
pub fn sanitize_entry_path(entry: &str) -> Result<Vec<String>> {
    let path = Path::new(entry);
    let mut parts = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| Error::InvalidPath {
                    path: path.to_path_buf(),
                })?;
                parts.push(part.to_string());
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::ZipSlip {
                    entry: entry.to_string(),
                });
            }
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_path_sanitization() {
        assert_eq!(sanitize_entry_path("bin/tool").unwrap(), vec!["bin", "tool"]);
        assert_eq!(sanitize_entry_path("./a/./b/").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn root_only_entry_is_empty() {
        assert!(sanitize_entry_path("./").unwrap().is_empty());
    }

    #[test]
    fn zip_slip_protection() {
        for malicious in ["/etc/passwd", "../escape", "a/../../b"] {
            assert!(
                matches!(sanitize_entry_path(malicious), Err(Error::ZipSlip { .. })),
                "{malicious}"
            );
        }
    }
}
