use std::fmt;
use std::str::FromStr;

use sha2::Digest as _;

use crate::VerificationError;

/// Length in bytes of a [`Digest`].
pub const DIGEST_LEN: usize = 0x20;

/// SHA-256 fingerprint of a staged file.
///
/// Rendered as lowercase hex on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Hash a byte buffer in one shot.
    pub fn of(data: &[u8]) -> Self { Self::from_slice(&sha2::Sha256::digest(data)) }

    pub(crate) fn from_slice(hash: &[u8]) -> Self {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(hash);
        Self(out)
    }

    pub fn to_hex(&self) -> String { hex::encode(self.0) }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut out).map_err(|_| VerificationError::InvalidDigest {
            expected: DIGEST_LEN * 2,
            actual:   s.to_string(),
        })?;
        Ok(Self(out))
    }
}
