use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::{Digest, Hasher, Result, Sha256Hasher};

const CHUNK_SIZE: usize = 64 * 1024;

/// Hash everything `reader` yields.
pub fn digest_reader<R: Read>(mut reader: R) -> Result<Digest> {
    let mut hasher = Sha256Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Digest of the file currently at `path`, or `None` if no file exists there.
pub fn digest_file(path: impl AsRef<Path>) -> Result<Option<Digest>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }
    let file = File::open(path)?;
    digest_reader(file).map(Some)
}
