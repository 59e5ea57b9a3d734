//! The per-title pipelines that run on the worker pool.

use std::path::Path;

use boxcat_archive::extract_zip;
use boxcat_fetch::{
    ContentKind, DownloadResult, Endpoint, HttpClient, StatusReport, TitleVersion,
    TransferClient, fetch_status, format_id,
};
use boxcat_fs::{Directory, atomic_read, copy_dir, remove_file_if_exists};
use tracing::{debug, error, info, warn};

use crate::error::SyncError;
use crate::{BoxcatConfig, DirectoryGetter, ERROR_TITLE, ErrorDisplay};

/// State every task of one [`crate::Boxcat`] reads.
pub(crate) struct Shared<C> {
    pub(crate) client:      C,
    pub(crate) config:      BoxcatConfig,
    pub(crate) endpoint:    Endpoint,
    pub(crate) directories: Box<dyn DirectoryGetter>,
    pub(crate) display:     Box<dyn ErrorDisplay>,
}

impl<C: HttpClient + Clone> Shared<C> {
    /// Fetch, extract, and copy one title's archive. `scope` limits the copy to
    /// one top-level subdirectory present on both sides.
    pub(crate) async fn synchronize(
        &self,
        title: TitleVersion,
        scope: Option<&str>,
    ) -> Result<(), SyncError> {
        let title_id = format_id(title.title_id);
        if self.config.local_only {
            info!(%title_id, "local-only mode, skipping download");
            return Ok(());
        }

        let staging = self.config.staging_path(title.title_id, ContentKind::Archive);
        let transfer = self.transfer(title, ContentKind::Archive);
        let result = transfer.fetch_archive().await;
        if !result.is_success() {
            self.download_failed(title.title_id, &staging, result);
            return Err(SyncError::Download(result));
        }

        let archive = read_staging(&staging)?;
        let extracted = extract_zip(&archive)?;
        debug!(
            %title_id,
            files = extracted.file_count,
            bytes = extracted.total_bytes,
            "extracted archive"
        );

        let target = self
            .directories
            .directory(title.title_id)
            .ok_or(SyncError::MissingDirectory)?;

        match scope {
            None => copy_dir(&*extracted.root, &*target).map_err(SyncError::Copy)?,
            Some(name) => {
                let dest = target.subdirectory(name).ok_or_else(|| {
                    SyncError::MissingSubdirectory {
                        name: name.to_string(),
                        side: "target directory",
                    }
                })?;
                let src = extracted.root.subdirectory(name).ok_or_else(|| {
                    SyncError::MissingSubdirectory {
                        name: name.to_string(),
                        side: "archive",
                    }
                })?;
                copy_dir(&*src, &*dest).map_err(SyncError::Copy)?;
            }
        }

        info!(%title_id, scope = scope.unwrap_or("*"), "synchronized");
        Ok(())
    }

    pub(crate) async fn launch_parameter(&self, title: TitleVersion) -> Option<Vec<u8>> {
        let title_id = format_id(title.title_id);
        let staging = self.config.staging_path(title.title_id, ContentKind::LaunchParameter);

        if self.config.local_only {
            info!(%title_id, "local-only mode, using cached launch parameter");
        } else {
            let result = self
                .transfer(title, ContentKind::LaunchParameter)
                .fetch_launch_parameter()
                .await;
            if !result.is_success() {
                self.download_failed(title.title_id, &staging, result);
                return None;
            }
        }

        match read_staging(&staging) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(%title_id, error = %e, "launch parameter unavailable");
                None
            }
        }
    }

    pub(crate) async fn status(&self) -> StatusReport {
        fetch_status(&self.client, &self.endpoint).await
    }

    fn transfer(&self, title: TitleVersion, kind: ContentKind) -> TransferClient<C> {
        TransferClient::new(
            self.client.clone(),
            self.endpoint.clone(),
            self.config.staging_path(title.title_id, kind),
            title,
        )
    }

    fn download_failed(&self, title_id: u64, staging: &Path, result: DownloadResult) {
        error!(title_id = %format_id(title_id), %result, "boxcat download failed");

        if result.invalidates_staging() {
            match remove_file_if_exists(staging) {
                Ok(removed) => debug!(path = %staging.display(), removed, "dropped staged file"),
                Err(e) => warn!(path = %staging.display(), error = %e, "cannot drop staged file"),
            }
        }

        if result.should_display() {
            self.display
                .show_custom_error(ERROR_TITLE, result.message(), Box::new(|| {}));
        }
    }
}

fn read_staging(path: &Path) -> Result<Vec<u8>, SyncError> {
    let bytes = atomic_read(path).map_err(SyncError::ReadStaging)?;
    if bytes.is_empty() {
        return Err(SyncError::EmptyStaging {
            path: path.to_path_buf(),
        });
    }
    Ok(bytes)
}
