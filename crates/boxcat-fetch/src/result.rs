//! Classification of a single fetch and how it is presented.

use std::fmt;

/// Outcome of one conditional fetch.
///
/// Closed and flat: transport and filesystem failures are folded into one of
/// these before leaving the transfer client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DownloadResult {
    Success,
    NoResponse,
    GeneralWebError,
    NoMatchTitleId,
    NoMatchBuildId,
    InvalidContentType,
    GeneralFSError,
    BadClientVersion,
}

impl DownloadResult {
    pub const ALL: [DownloadResult; 8] = [
        DownloadResult::Success,
        DownloadResult::NoResponse,
        DownloadResult::GeneralWebError,
        DownloadResult::NoMatchTitleId,
        DownloadResult::NoMatchBuildId,
        DownloadResult::InvalidContentType,
        DownloadResult::GeneralFSError,
        DownloadResult::BadClientVersion,
    ];

    pub fn is_success(self) -> bool { self == DownloadResult::Success }

    /// The server has nothing usable for this title or build; a staged copy must not
    /// be served later.
    pub fn invalidates_staging(self) -> bool {
        matches!(
            self,
            DownloadResult::NoMatchTitleId | DownloadResult::NoMatchBuildId
        )
    }

    /// Whether the end user should be told. Only mismatches the user can act on
    /// (stale client, blacklisted build) qualify.
    pub fn should_display(self) -> bool {
        matches!(
            self,
            DownloadResult::NoMatchBuildId | DownloadResult::BadClientVersion
        )
    }

    pub fn message(self) -> &'static str {
        match self {
            DownloadResult::Success => "Success",
            DownloadResult::NoResponse => "There was no response from the server.",
            DownloadResult::GeneralWebError => {
                "There was a general web error code returned from the server."
            }
            DownloadResult::NoMatchTitleId => {
                "The title ID of the current game doesn't have a boxcat implementation. If you \
                 believe an implementation should be added, contact yuzu support."
            }
            DownloadResult::NoMatchBuildId => {
                "The build ID of the current version of the game is marked as incompatible with \
                 the current BCAT distribution. Try upgrading or downgrading your game version or \
                 contacting yuzu support."
            }
            DownloadResult::InvalidContentType => {
                "The content type of the web response was invalid."
            }
            DownloadResult::GeneralFSError => {
                "There was a general filesystem error while saving the zip file."
            }
            DownloadResult::BadClientVersion => {
                "The server is either too new or too old to serve the request. Try using the \
                 latest version of an official release of yuzu."
            }
        }
    }
}

impl fmt::Display for DownloadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.message()) }
}
