//! Wire constants and identifiers of the boxcat protocol.

use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.yuzu-emu.org";
pub const DEFAULT_CLIENT_TYPE: &str = "yuzu";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_VERSION: &str = "1";

pub const HEADER_CLIENT_VERSION: &str = "Boxcat-Client-Version";
pub const HEADER_CLIENT_TYPE: &str = "Boxcat-Client-Type";
pub const HEADER_BUILD_ID: &str = "Boxcat-Build-Id";
pub const HEADER_DATA_DIGEST: &str = "Boxcat-Data-Digest";
pub const HEADER_LAUNCH_PARAM_DIGEST: &str = "Boxcat-LaunchParam-Digest";

pub const PATH_EVENTS: &str = "/boxcat/events";

/// HTTP status codes with protocol meaning.
pub mod status {
    pub const OK: u16 = 200;
    /// The client version header doesn't match the server.
    pub const BAD_CLIENT_VERSION: u16 = 301;
    /// The supplied digest matches the current data.
    pub const NO_UPDATE: u16 = 304;
    /// The title has no boxcat data.
    pub const NO_MATCH_TITLE_ID: u16 = 404;
    /// The build is blacklisted and has no data.
    pub const NO_MATCH_BUILD_ID: u16 = 406;
}

/// Identity of one synchronization request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TitleVersion {
    pub title_id: u64,
    pub build_id: u64,
}

impl TitleVersion {
    pub const fn new(title_id: u64, build_id: u64) -> Self { Self { title_id, build_id } }
}

/// 16 uppercase hex digits, zero-padded.
pub fn format_id(id: u64) -> String { format!("{id:016X}") }

/// The two kinds of per-title content the service distributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// The data zip archive.
    Archive,
    /// The small launch-parameter blob.
    LaunchParameter,
}

impl ContentKind {
    pub fn path(self, title_id: u64) -> String {
        match self {
            ContentKind::Archive => format!("/boxcat/titles/{}/data", format_id(title_id)),
            ContentKind::LaunchParameter => {
                format!("/boxcat/titles/{}/launchparam", format_id(title_id))
            }
        }
    }

    pub fn digest_header(self) -> &'static str {
        match self {
            ContentKind::Archive => HEADER_DATA_DIGEST,
            ContentKind::LaunchParameter => HEADER_LAUNCH_PARAM_DIGEST,
        }
    }

    pub fn expected_content_type(self) -> &'static str {
        match self {
            ContentKind::Archive => "application/zip",
            ContentKind::LaunchParameter => "application/octet-stream",
        }
    }

    /// Launch parameters get a third of the base timeout.
    pub fn timeout(self, base: Duration) -> Duration {
        match self {
            ContentKind::Archive => base,
            ContentKind::LaunchParameter => base / 3,
        }
    }

    /// File name of the staging file within a title's cache directory.
    pub fn staging_file_name(self) -> &'static str {
        match self {
            ContentKind::Archive => "data.zip",
            ContentKind::LaunchParameter => "launchparam.bin",
        }
    }
}

/// The remote service and how this client introduces itself to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    base_url:        String,
    pub client_type: String,
    pub timeout:     Duration,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base_url:    DEFAULT_BASE_URL.to_string(),
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
            timeout:     DEFAULT_TIMEOUT,
        }
    }
}

impl Endpoint {
    /// Point at `base_url`, which must be an `http` or `https` origin.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let problem = match base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
        {
            None => Some("scheme must be http or https"),
            Some(host) if host.trim_end_matches('/').is_empty() => Some("missing host"),
            Some(_) => None,
        };
        if let Some(reason) = problem {
            return Err(Error::InvalidEndpoint {
                url: base_url,
                reason,
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn client_type(mut self, client_type: impl Into<String>) -> Self {
        self.client_type = client_type.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    /// Headers identifying the client, sent with every request.
    pub fn identity_headers(&self) -> Vec<(String, String)> {
        vec![
            (HEADER_CLIENT_VERSION.to_string(), API_VERSION.to_string()),
            (HEADER_CLIENT_TYPE.to_string(), self.client_type.clone()),
        ]
    }
}
