//! Key derivation
//!
//! `derive_kek` — Argon2id, derives the 32-byte key-encryption key from the
//! owner's password.  A leaked wrapped key is only as weak as the KDF is
//! fast, so the parameters are memory-hard.

use argon2::{Argon2, Params, Version};
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;

/// 32-byte KEK derived from the owner's password. Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct KekKey(pub [u8; 32]);

/// Argon2id parameters — tuned for interactive use.
fn argon2_params() -> Params {
    Params::new(
        64 * 1024, // m_cost: 64 MiB
        3,         // t_cost: 3 iterations
        1,         // p_cost: 1 thread
        Some(32),  // output len
    )
    .expect("Static Argon2 params are always valid")
}

/// Derive a KEK from a password + 16-byte salt.
/// The salt is stored alongside the wrapped key (not secret).
pub fn derive_kek(password: &[u8], salt: &[u8; 16]) -> Result<KekKey, CryptoError> {
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon2_params());
    let mut output = [0u8; 32];
    argon2
        .hash_password_into(password, salt, &mut output)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(KekKey(output))
}

/// Generate a fresh random 16-byte salt.
pub fn generate_salt() -> [u8; 16] {
    let mut salt = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let salt = generate_salt();
        let a = derive_kek(b"correct horse", &salt).unwrap();
        let b = derive_kek(b"correct horse", &salt).unwrap();
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn salt_and_password_both_change_the_key() {
        let salt = generate_salt();
        let base = derive_kek(b"correct horse", &salt).unwrap();

        let other_pw = derive_kek(b"battery staple", &salt).unwrap();
        assert_ne!(base.0, other_pw.0);

        let other_salt = derive_kek(b"correct horse", &generate_salt()).unwrap();
        assert_ne!(base.0, other_salt.0);
    }
}
