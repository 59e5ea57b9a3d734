use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is corrupted")]
    Corrupted(#[source] zip::result::ZipError),

    #[error("zip-slip attack detected: entry '{entry}'")]
    ZipSlip { entry: String },

    #[error("entry path is not valid UTF-8: '{path}'")]
    InvalidPath { path: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: String, source: io::Error },

    #[error("failed to build extracted tree: {source}")]
    Tree {
        #[from]
        source: boxcat_fs::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
