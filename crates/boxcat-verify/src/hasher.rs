use sha2::Digest as _;

use crate::Digest;

/// Incremental hasher fed as bytes stream past.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Digest;
}

#[derive(Clone, Default)]
pub struct Sha256Hasher(sha2::Sha256);

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }
}

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }

    fn finalize(self) -> Digest { Digest::from_slice(&self.0.finalize()) }
}
