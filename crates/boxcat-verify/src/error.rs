use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid digest: expected {expected} hex characters, got {actual:?}")]
    InvalidDigest { expected: usize, actual: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerificationError>;
