//! Artifact checksum verification (SHA-256).

use std::path::Path;

use sutras_util::errors::{SutrasError, SutrasResult};
use sutras_util::hash::{normalize_sha256, sha256_bytes, sha256_file};

/// Verify `data` against an expected `sha256:<hex>` or bare hex digest.
pub fn verify(data: &[u8], expected: &str, label: &str) -> SutrasResult<()> {
    check(&sha256_bytes(data), expected, label)
}

/// Verify a file on disk against an expected digest.
pub fn verify_file(path: &Path, expected: &str) -> SutrasResult<()> {
    let actual = sha256_file(path)?;
    check(&actual, expected, &path.display().to_string())
}

fn check(actual: &str, expected: &str, label: &str) -> SutrasResult<()> {
    let expected = normalize_sha256(expected);
    if actual.eq_ignore_ascii_case(&expected) {
        tracing::debug!("SHA-256 ok for {label}");
        Ok(())
    } else {
        Err(SutrasError::Registry {
            message: format!("SHA-256 mismatch for {label}: expected {expected}, got {actual}"),
        })
    }
}
