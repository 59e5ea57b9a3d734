//! Error types for boxcat-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
