//! Content digests for conditional boxcat requests.
//!
//! The remote service decides whether a client already holds the latest data by
//! comparing a SHA-256 fingerprint of the currently staged file against its own.
//! This crate computes that fingerprint incrementally so large staging files are
//! never loaded whole just to be hashed.
//!
//! # Example
//!
//! ```
//! use boxcat_verify::{Digest, Hasher, Sha256Hasher};
//!
//! let mut hasher = Sha256Hasher::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//!
//! assert_eq!(hasher.finalize(), Digest::of(b"hello world"));
//! ```

pub use self::digest::{DIGEST_LEN, Digest};
pub use self::error::{Result, VerificationError};
pub use self::hasher::{Hasher, Sha256Hasher};
pub use self::reader::{digest_file, digest_reader};

mod digest;
mod error;
mod hasher;
mod reader;
