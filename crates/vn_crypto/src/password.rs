//! Password hashing for access gates: Argon2id PHC strings.
//! Only the digest is ever persisted.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::CryptoError;

/// Hash a password into a self-describing PHC string.
pub fn hash(password: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))
}

/// Verify a password against a stored digest.  A malformed digest verifies
/// as false rather than erroring.
pub fn verify(password: &str, digest: &str) -> bool {
    PasswordHash::new(digest)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_only_the_original_password() {
        let digest = hash("hunter2").unwrap();
        assert!(verify("hunter2", &digest));
        assert!(!verify("hunter3", &digest));
        assert!(!verify("", &digest));
    }

    #[test]
    fn digests_are_salted() {
        assert_ne!(hash("hunter2").unwrap(), hash("hunter2").unwrap());
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify("hunter2", "not-a-phc-string"));
    }
}
