//! Content fingerprinting using BLAKE3

use crate::error::SyncError;
use blake3::Hasher;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Content digest of a file, comparable by equality
pub type Fingerprint = [u8; 32];

/// Chunk size for streamed hashing
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the content fingerprint of a file
///
/// Streams the file in bounded chunks and folds each chunk into a running
/// BLAKE3 state, so arbitrarily large files never get buffered whole. Only
/// byte content contributes to the digest: two files with identical bytes
/// produce equal fingerprints regardless of metadata or timestamps.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, SyncError> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Hasher::new();

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        hasher.update(chunk);
        let consumed = chunk.len();
        reader.consume(consumed);
    }

    Ok(*hasher.finalize().as_bytes())
}
