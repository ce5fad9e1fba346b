use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Prefix used when checksums are written with their algorithm, e.g. `sha256:ab12…`.
pub const SHA256_PREFIX: &str = "sha256:";

/// Compute the SHA-256 hash of a file, returning a lowercase hex string.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the SHA-256 hash of a byte slice, returning a lowercase hex string.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Strip an optional `sha256:` prefix and surrounding whitespace, lowercasing the digest.
pub fn normalize_sha256(checksum: &str) -> String {
    let trimmed = checksum.trim();
    trimmed
        .strip_prefix(SHA256_PREFIX)
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}
