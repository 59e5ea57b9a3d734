use std::path::{Path, PathBuf};

use boxcat_fs::{AtomicWriteOptions, atomic_write};
use boxcat_verify::digest_file;
use tracing::{debug, error, warn};

use crate::http::{HttpClient, HttpResponse};
use crate::protocol::{ContentKind, Endpoint, HEADER_BUILD_ID, TitleVersion, format_id, status};
use crate::result::DownloadResult;

/// What to do with a response once its status and content type are known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Nothing to write; the fetch is over with this result.
    Finished(DownloadResult),
    /// The body is fresh content and must be staged.
    Store,
}

/// Map a response onto the protocol, in priority order.
///
/// A 304 is success without a body: the staged file is already current.
pub fn classify_response(
    status: u16,
    content_type: Option<&str>,
    expected_content_type: &str,
) -> Disposition {
    let result = match status {
        status::NO_UPDATE => DownloadResult::Success,
        status::BAD_CLIENT_VERSION => DownloadResult::BadClientVersion,
        status::NO_MATCH_TITLE_ID => DownloadResult::NoMatchTitleId,
        status::NO_MATCH_BUILD_ID => DownloadResult::NoMatchBuildId,
        status::OK => match content_type {
            Some(ct) if ct.contains(expected_content_type) => return Disposition::Store,
            _ => DownloadResult::InvalidContentType,
        },
        _ => DownloadResult::GeneralWebError,
    };
    Disposition::Finished(result)
}

/// Performs digest-gated fetches of one title's content into one staging file.
///
/// Each call is a single attempt. The connection held by `C` is established on
/// first use and reused by later calls on the same instance.
pub struct TransferClient<C: HttpClient> {
    client:   C,
    endpoint: Endpoint,
    path:     PathBuf,
    title:    TitleVersion,
}

impl<C: HttpClient> TransferClient<C> {
    pub fn new(client: C, endpoint: Endpoint, path: impl Into<PathBuf>, title: TitleVersion) -> Self {
        Self {
            client,
            endpoint,
            path: path.into(),
            title,
        }
    }

    pub fn staging_path(&self) -> &Path { &self.path }

    pub async fn fetch_archive(&self) -> DownloadResult { self.fetch(ContentKind::Archive).await }

    pub async fn fetch_launch_parameter(&self) -> DownloadResult {
        self.fetch(ContentKind::LaunchParameter).await
    }

    async fn fetch(&self, kind: ContentKind) -> DownloadResult {
        let title_id = format_id(self.title.title_id);
        let url = self.endpoint.url(&kind.path(self.title.title_id));

        let mut headers = self.endpoint.identity_headers();
        headers.push((HEADER_BUILD_ID.to_string(), format_id(self.title.build_id)));

        match digest_file(&self.path) {
            Ok(Some(digest)) => headers.push((kind.digest_header().to_string(), digest.to_hex())),
            Ok(None) => {}
            Err(e) => {
                error!(%title_id, path = %self.path.display(), error = %e, "failed to digest staged file");
                return DownloadResult::GeneralFSError;
            }
        }

        let timeout = kind.timeout(self.endpoint.timeout);
        debug!(%title_id, %url, ?timeout, "requesting boxcat content");

        let response = match self.client.get(&url, &headers, timeout).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%title_id, %url, error = %e, "no response from boxcat server");
                return DownloadResult::NoResponse;
            }
        };

        match classify_response(
            response.status,
            response.content_type.as_deref(),
            kind.expected_content_type(),
        ) {
            Disposition::Finished(result) => {
                debug!(%title_id, status = response.status, ?result, "fetch finished without write");
                result
            }
            Disposition::Store => self.store(&title_id, &response),
        }
    }

    fn store(&self, title_id: &str, response: &HttpResponse) -> DownloadResult {
        match atomic_write(&self.path, &response.body, AtomicWriteOptions::new().sync(true)) {
            Ok(()) => {
                debug!(%title_id, bytes = response.body.len(), path = %self.path.display(), "staged content");
                DownloadResult::Success
            }
            Err(e) => {
                error!(%title_id, path = %self.path.display(), error = %e, "failed to stage content");
                DownloadResult::GeneralFSError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockHttpClient;
    use boxcat_verify::Digest;
    use std::time::Duration;
    use tempfile::TempDir;

    const TITLE: TitleVersion = TitleVersion::new(0x0100_0000_0000_1337, 0xABCD);
    const DATA_PATH: &str = "/boxcat/titles/0100000000001337/data";
    const PARAM_PATH: &str = "/boxcat/titles/0100000000001337/launchparam";

    fn setup(file: &str) -> (TempDir, PathBuf, MockHttpClient) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bcat").join(file);
        (dir, path, MockHttpClient::new())
    }

    fn transfer(client: &MockHttpClient, path: &Path) -> TransferClient<MockHttpClient> {
        TransferClient::new(client.clone(), Endpoint::default(), path, TITLE)
    }

    fn zip_ok(body: &'static [u8]) -> HttpResponse {
        HttpResponse::new(200).content_type("application/zip").body(body)
    }

    #[test]
    fn classification_priority() {
        let ct = Some("application/zip");
        let expected = "application/zip";
        for (status, disposition) in [
            (304, Disposition::Finished(DownloadResult::Success)),
            (301, Disposition::Finished(DownloadResult::BadClientVersion)),
            (404, Disposition::Finished(DownloadResult::NoMatchTitleId)),
            (406, Disposition::Finished(DownloadResult::NoMatchBuildId)),
            (500, Disposition::Finished(DownloadResult::GeneralWebError)),
            (302, Disposition::Finished(DownloadResult::GeneralWebError)),
            (200, Disposition::Store),
        ] {
            assert_eq!(classify_response(status, ct, expected), disposition, "{status}");
        }
    }

    #[test]
    fn content_type_is_a_substring_match() {
        assert_eq!(
            classify_response(200, Some("application/zip; charset=binary"), "application/zip"),
            Disposition::Store
        );
        assert_eq!(
            classify_response(200, Some("text/html"), "application/zip"),
            Disposition::Finished(DownloadResult::InvalidContentType)
        );
        assert_eq!(
            classify_response(200, None, "application/zip"),
            Disposition::Finished(DownloadResult::InvalidContentType)
        );
    }

    #[tokio::test]
    async fn identity_headers_without_digest_when_nothing_staged() {
        let (_dir, path, client) = setup("data.zip");
        client.respond(DATA_PATH, HttpResponse::new(304));

        assert_eq!(transfer(&client, &path).fetch_archive().await, DownloadResult::Success);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, format!("https://api.yuzu-emu.org{DATA_PATH}"));
        assert_eq!(request.header("Boxcat-Client-Version"), Some("1"));
        assert_eq!(request.header("Boxcat-Client-Type"), Some("yuzu"));
        assert_eq!(request.header("Boxcat-Build-Id"), Some("000000000000ABCD"));
        assert_eq!(request.header("Boxcat-Data-Digest"), None);
        assert_eq!(request.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn digest_of_staged_file_is_attached() {
        let (_dir, path, client) = setup("data.zip");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"previous archive").unwrap();
        client.respond(DATA_PATH, HttpResponse::new(304));

        transfer(&client, &path).fetch_archive().await;

        let digest = Digest::of(b"previous archive").to_hex();
        assert_eq!(client.requests()[0].header("Boxcat-Data-Digest"), Some(digest.as_str()));
    }

    #[tokio::test]
    async fn not_modified_leaves_staged_bytes_alone() {
        let (_dir, path, client) = setup("data.zip");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"current").unwrap();
        client.respond(DATA_PATH, HttpResponse::new(304).body(&b"ignored"[..]));

        assert_eq!(transfer(&client, &path).fetch_archive().await, DownloadResult::Success);
        assert_eq!(std::fs::read(&path).unwrap(), b"current");
    }

    #[tokio::test]
    async fn fresh_body_replaces_staged_file() {
        let (_dir, path, client) = setup("data.zip");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"a much longer previous archive body").unwrap();
        client.respond(DATA_PATH, zip_ok(b"new"));

        assert_eq!(transfer(&client, &path).fetch_archive().await, DownloadResult::Success);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn wrong_content_type_writes_nothing() {
        let (_dir, path, client) = setup("data.zip");
        client.respond(
            DATA_PATH,
            HttpResponse::new(200).content_type("text/html").body(&b"<html>"[..]),
        );

        assert_eq!(
            transfer(&client, &path).fetch_archive().await,
            DownloadResult::InvalidContentType
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn mismatch_statuses_leave_staging_untouched() {
        for (status, expected) in [
            (301, DownloadResult::BadClientVersion),
            (404, DownloadResult::NoMatchTitleId),
            (406, DownloadResult::NoMatchBuildId),
            (503, DownloadResult::GeneralWebError),
        ] {
            let (_dir, path, client) = setup("data.zip");
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"staged").unwrap();
            client.respond(DATA_PATH, HttpResponse::new(status));

            assert_eq!(transfer(&client, &path).fetch_archive().await, expected);
            assert_eq!(std::fs::read(&path).unwrap(), b"staged");
        }
    }

    #[tokio::test]
    async fn transport_failure_is_no_response() {
        let (_dir, path, client) = setup("data.zip");
        assert_eq!(transfer(&client, &path).fetch_archive().await, DownloadResult::NoResponse);
    }

    #[tokio::test]
    async fn unwritable_staging_path_is_fs_error() {
        let (dir, _, client) = setup("data.zip");
        // A regular file where the staging directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("data.zip");
        client.respond(DATA_PATH, zip_ok(b"zip"));

        assert_eq!(
            transfer(&client, &path).fetch_archive().await,
            DownloadResult::GeneralFSError
        );
    }

    #[tokio::test]
    async fn launch_parameter_uses_its_own_path_header_and_timeout() {
        let (_dir, path, client) = setup("launchparam.bin");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"param").unwrap();
        client.respond(
            PARAM_PATH,
            HttpResponse::new(200)
                .content_type("application/octet-stream")
                .body(&b"fresh param"[..]),
        );

        let result = transfer(&client, &path).fetch_launch_parameter().await;
        assert_eq!(result, DownloadResult::Success);
        assert_eq!(std::fs::read(&path).unwrap(), b"fresh param");

        let request = &client.requests()[0];
        assert!(request.url.ends_with(PARAM_PATH));
        assert_eq!(request.timeout, Duration::from_secs(10));
        assert_eq!(
            request.header("Boxcat-LaunchParam-Digest"),
            Some(Digest::of(b"param").to_hex().as_str())
        );
        assert_eq!(request.header("Boxcat-Data-Digest"), None);
    }

    #[tokio::test]
    async fn launch_parameter_rejects_zip_content_type() {
        let (_dir, path, client) = setup("launchparam.bin");
        client.respond(PARAM_PATH, zip_ok(b"zip"));
        assert_eq!(
            transfer(&client, &path).fetch_launch_parameter().await,
            DownloadResult::InvalidContentType
        );
    }
}
