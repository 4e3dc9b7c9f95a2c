use ring::digest::{digest, SHA256};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroize;

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Trait defining the hashing and randomness helpers used by workspaces.
pub trait CryptoServiceTrait {
    /// SHA-256 of `input`, lowercase hex.
    fn sha256_hex(&self, input: &str) -> String;

    /// Hashes a plaintext password and wipes the plaintext buffer.
    fn hash_password(&self, plaintext: &mut String) -> String;

    /// Checks a plaintext attempt against a stored digest.
    fn verify_password(&self, attempt: &str, stored_digest: &str) -> bool;

    /// Generates cryptographically secure random bytes of the specified length.
    fn generate_random_bytes(&self, length: usize) -> Vec<u8>;

    /// `count` random base-36 digits.
    fn random_base36(&self, count: usize) -> String;
}

/// Implementation of crypto helpers using the `ring` crate.
pub struct CryptoService {
    rng: SystemRandom,
}

impl CryptoService {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for CryptoService {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoServiceTrait for CryptoService {
    fn sha256_hex(&self, input: &str) -> String {
        hex::encode(digest(&SHA256, input.as_bytes()))
    }

    fn hash_password(&self, plaintext: &mut String) -> String {
        let hashed = self.sha256_hex(plaintext);
        plaintext.zeroize();
        hashed
    }

    fn verify_password(&self, attempt: &str, stored_digest: &str) -> bool {
        !stored_digest.is_empty() && self.sha256_hex(attempt).eq_ignore_ascii_case(stored_digest)
    }

    fn generate_random_bytes(&self, length: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; length];
        self.rng
            .fill(&mut bytes)
            .expect("Failed to generate random bytes");
        bytes
    }

    fn random_base36(&self, count: usize) -> String {
        // 252 is the largest multiple of 36 that fits a byte; rejecting above it keeps digits uniform.
        let mut out = String::with_capacity(count);
        while out.len() < count {
            for b in self.generate_random_bytes(count * 2) {
                if b < 252 && out.len() < count {
                    out.push(BASE36_DIGITS[(b % 36) as usize] as char);
                }
            }
        }
        out
    }
}
