use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to delete '{path}': {source}")]
    Delete { path: PathBuf, source: io::Error },

    #[error("'{path}' has no parent directory")]
    NoParent { path: PathBuf },

    #[error("no such entry: '{name}'")]
    NotFound { name: String },

    #[error("invalid entry name: {name:?}")]
    InvalidName { name: String },

    #[error("'{name}' already exists as a different kind of entry")]
    KindConflict { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
