//! Envelope encryption: wrapping a note's DEK under a password-derived KEK.
//!
//! The wrapped form is one transportable base64url string of
//! `nonce (24 bytes) || ciphertext + tag`.  Re-keying on password change
//! touches only this 32-byte key, never the note content.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::aead::{self, KEY_LEN, NONCE_LEN};
use crate::error::CryptoError;

/// Encrypt a 32-byte DEK under a 32-byte KEK.
pub fn wrap_key(dek: &[u8; KEY_LEN], kek: &[u8; KEY_LEN]) -> Result<String, CryptoError> {
    let (ciphertext, nonce) = aead::encrypt(kek, dek)?;
    let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    framed.extend_from_slice(&nonce);
    framed.extend_from_slice(&ciphertext);
    Ok(URL_SAFE_NO_PAD.encode(framed))
}

/// Recover a DEK wrapped by [`wrap_key`].
///
/// Every failure mode (bad encoding, truncation, tag mismatch) collapses to
/// `CryptoError::KeyUnwrap` — "wrong password" and "corrupted key" must be
/// indistinguishable.
pub fn unwrap_key(wrapped: &str, kek: &[u8; KEY_LEN]) -> Result<[u8; KEY_LEN], CryptoError> {
    let framed = URL_SAFE_NO_PAD
        .decode(wrapped)
        .map_err(|_| CryptoError::KeyUnwrap)?;
    if framed.len() < NONCE_LEN {
        return Err(CryptoError::KeyUnwrap);
    }
    let (nonce, ciphertext) = framed.split_at(NONCE_LEN);

    let plaintext = aead::decrypt(kek, ciphertext, nonce).map_err(|_| CryptoError::KeyUnwrap)?;
    let dek: [u8; KEY_LEN] = plaintext
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::KeyUnwrap)?;
    Ok(dek)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aead::generate_dek;

    #[test]
    fn wrap_unwrap_roundtrip() {
        let dek = generate_dek();
        let kek = generate_dek();
        let wrapped = wrap_key(&dek, &kek).unwrap();
        assert_eq!(unwrap_key(&wrapped, &kek).unwrap(), dek);
    }

    #[test]
    fn wrong_kek_is_key_unwrap_error() {
        let dek = generate_dek();
        let kek = generate_dek();
        let other = generate_dek();
        let wrapped = wrap_key(&dek, &kek).unwrap();
        assert!(matches!(
            unwrap_key(&wrapped, &other),
            Err(CryptoError::KeyUnwrap)
        ));
    }

    #[test]
    fn corrupted_wrapping_is_key_unwrap_error() {
        let dek = generate_dek();
        let kek = generate_dek();
        let wrapped = wrap_key(&dek, &kek).unwrap();

        let mut garbled = wrapped.into_bytes();
        let last = garbled.len() - 1;
        garbled[last] = if garbled[last] == b'A' { b'B' } else { b'A' };
        let garbled = String::from_utf8(garbled).unwrap();

        assert!(matches!(
            unwrap_key(&garbled, &kek),
            Err(CryptoError::KeyUnwrap)
        ));
        assert!(matches!(
            unwrap_key("not-base64!!!", &kek),
            Err(CryptoError::KeyUnwrap)
        ));
        assert!(matches!(unwrap_key("", &kek), Err(CryptoError::KeyUnwrap)));
    }
}
