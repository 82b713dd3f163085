//! Content hashing utilities.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of raw bytes and returns it as a lowercase hex string.
///
/// Used as the content hash of uploaded import files.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
