use std::path::PathBuf;

use boxcat_fetch::DownloadResult;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced synchronously to the host.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),

    #[error(transparent)]
    Endpoint(#[from] boxcat_fetch::Error),

    #[error("title {title_id:016X} is already being synchronized")]
    AlreadySyncing { title_id: u64 },

    #[error("no content directory available for title {title_id:016X}")]
    NoDirectory { title_id: u64 },

    #[error("failed to clear '{name}' of title {title_id:016X}: {source}")]
    Clear {
        title_id: u64,
        name:     String,
        #[source]
        source:   boxcat_fs::Error,
    },

    #[error(transparent)]
    Fs(#[from] boxcat_fs::Error),
}

/// Why one background synchronization reported failure.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("download failed: {0}")]
    Download(DownloadResult),

    #[error("staged file '{path}' is empty")]
    EmptyStaging { path: PathBuf },

    #[error("failed to read staged file: {0}")]
    ReadStaging(#[source] boxcat_fs::Error),

    #[error("failed to extract staged archive: {0}")]
    Extract(#[from] boxcat_archive::Error),

    #[error("no content directory available for the title")]
    MissingDirectory,

    #[error("subdirectory '{name}' is missing from the {side}")]
    MissingSubdirectory { name: String, side: &'static str },

    #[error("failed to copy extracted content: {0}")]
    Copy(#[source] boxcat_fs::Error),
}
