//! Conditional boxcat content fetching and response classification.
//!
//! # Architecture
//!
//! - [`protocol`] - wire constants, identifiers, and the [`Endpoint`] being talked to
//! - [`result`] - the closed [`DownloadResult`] taxonomy and its presentation policy
//! - [`TransferClient`] - one digest-gated GET per call, staged to disk on success
//! - [`status`] - the announcement feed and its tolerant parser
//! - [`HttpClient`] - the transport seam; [`ReqwestClient`] in production,
//!   `MockHttpClient` behind the `mock` feature for tests
//!
//! Nothing here retries. Every transport failure is classified before it leaves
//! the crate, so callers only ever see a [`DownloadResult`] or a [`StatusReport`].

mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod protocol;
pub mod result;
pub mod status;
mod transfer;

pub use error::{Error, Result};
pub use http::{HttpClient, HttpResponse};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockHttpClient, MockNoResponse, RecordedRequest};
pub use protocol::{ContentKind, Endpoint, TitleVersion, format_id};
pub use result::DownloadResult;
pub use status::{EventStatus, StatusReport, StatusResult, fetch_status, parse_status};
pub use transfer::{Disposition, TransferClient, classify_response};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
