//! SHA-256 content verification for downloaded artifacts.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

const CHUNK_SIZE: usize = 1024 * 1024;
const DISPLAY_PREFIX: usize = 16;

/// Compute the SHA-256 of a file, read in fixed-size chunks.
///
/// Returns the digest as a lowercase hexadecimal string.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify a file against an expected digest.
///
/// An absent expectation always passes. I/O errors while hashing count as
/// a failed verification.
pub fn verify_checksum(path: &Path, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    let name = path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    debug!(file = %name, "Verifying checksum");

    match sha256_file(path) {
        Ok(actual) if actual.eq_ignore_ascii_case(expected.trim()) => {
            info!(file = %name, "Checksum verified: {}...", short(expected));
            true
        }
        Ok(actual) => {
            error!(
                file = %name,
                "Checksum mismatch! Expected: {}..., Got: {}...",
                short(expected),
                short(&actual)
            );
            false
        }
        Err(e) => {
            error!(file = %name, "Checksum verification failed: {e}");
            false
        }
    }
}

fn short(digest: &str) -> &str {
    digest.get(..DISPLAY_PREFIX).unwrap_or(digest)
}
