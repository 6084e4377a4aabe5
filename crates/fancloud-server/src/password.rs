//! Salted SHA-256 password hashing with constant-time verification.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_HEX_CHARS: usize = 32;

/// A stored credential: hex digest plus the hex salt it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Hash `password` under a fresh random salt.
pub fn hash_password(password: &str) -> PasswordHash {
    let salt = format!("{:0width$x}", rand::random::<u128>(), width = SALT_HEX_CHARS);
    let hash = digest(&salt, password);
    PasswordHash { hash, salt }
}

/// Compare `password` against a stored hash without short-circuiting.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let actual = digest(salt, password);
    actual.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_same_password() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored.salt, &stored.hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let stored = hash_password("correct horse");
        assert!(!verify_password("battery staple", &stored.salt, &stored.hash));
    }

    #[test]
    fn salts_differ_between_calls() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
        assert_eq!(a.salt.len(), SALT_HEX_CHARS);
        assert!(a.salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_lowercase_hex_sha256() {
        // sha256("") with an empty salt
        assert_eq!(
            digest("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_rejects_truncated_hash() {
        let stored = hash_password("pw123456");
        assert!(!verify_password("pw123456", &stored.salt, &stored.hash[..10]));
    }
}
