use sha2::{Digest, Sha256};

/// One-way hex digest of a password (SHA-256)
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a candidate password against a stored digest without
/// short-circuiting on the first differing byte.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let candidate = digest_password(password);
    if candidate.len() != digest.len() {
        return false;
    }
    candidate
        .bytes()
        .zip(digest.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
