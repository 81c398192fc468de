//! Prompt fingerprinting, so logs show which prompt revision served a request.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Length of the abbreviated fingerprint printed in logs.
const SHORT_HASH_LEN: usize = 12;

/// Compute a short, stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let mut hex = String::with_capacity(SHORT_HASH_LEN);
    for byte in digest.iter().take(SHORT_HASH_LEN / 2) {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
