//! Authenticated Encryption with Associated Data
//!
//! Uses XChaCha20-Poly1305 (192-bit nonce).
//! Key size: 32 bytes.  Nonce: 24 bytes (random, fresh per call).  Tag: 16 bytes.
//!
//! The nonce is returned beside the ciphertext rather than framed into it:
//! note records persist the two in separate columns.

use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::CryptoError;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;

/// Generate a random 256-bit data-encryption key.
pub fn generate_dek() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    rand::rngs::OsRng.fill_bytes(&mut key);
    key
}

/// Encrypt `plaintext` with a 32-byte key under a fresh random nonce.
/// Returns `(ciphertext + tag, nonce)`.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), CryptoError> {
    let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::Encrypt)?;

    let nonce = XChaCha20Poly1305::generate_nonce(&mut AeadOsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    Ok((ciphertext, nonce_bytes))
}

/// Decrypt `ciphertext + tag` under `nonce`.
/// Fails with `CryptoError::Authentication` on tag mismatch or a nonce of
/// the wrong length; never returns partially decrypted data.
pub fn decrypt(
    key: &[u8; KEY_LEN],
    ciphertext: &[u8],
    nonce: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::Authentication);
    }
    let nonce = XNonce::from_slice(nonce);

    let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::Authentication)?;
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::Authentication)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = generate_dek();
        let (ct, nonce) = encrypt(&key, b"the plaintext never reaches the server").unwrap();
        let pt = decrypt(&key, &ct, &nonce).unwrap();
        assert_eq!(pt.as_slice(), b"the plaintext never reaches the server");
    }

    #[test]
    fn nonce_is_fresh_per_call() {
        let key = generate_dek();
        let (_, n1) = encrypt(&key, b"same input").unwrap();
        let (_, n2) = encrypt(&key, b"same input").unwrap();
        assert_ne!(n1, n2);
    }

    #[test]
    fn tampered_ciphertext_fails_closed() {
        let key = generate_dek();
        let (mut ct, nonce) = encrypt(&key, b"payload").unwrap();
        for i in 0..ct.len() {
            ct[i] ^= 0x01;
            assert!(matches!(
                decrypt(&key, &ct, &nonce),
                Err(CryptoError::Authentication)
            ));
            ct[i] ^= 0x01;
        }
    }

    #[test]
    fn tampered_nonce_fails_closed() {
        let key = generate_dek();
        let (ct, mut nonce) = encrypt(&key, b"payload").unwrap();
        nonce[0] ^= 0x80;
        assert!(matches!(
            decrypt(&key, &ct, &nonce),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn wrong_nonce_length_rejected() {
        let key = generate_dek();
        let (ct, nonce) = encrypt(&key, b"payload").unwrap();
        assert!(matches!(
            decrypt(&key, &ct, &nonce[..12]),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn wrong_key_fails_closed() {
        let key = generate_dek();
        let other = generate_dek();
        let (ct, nonce) = encrypt(&key, b"payload").unwrap();
        assert!(decrypt(&other, &ct, &nonce).is_err());
    }
}
