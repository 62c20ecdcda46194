use thiserror::Error;

/// Cryptographic failures deliberately carry one generic message each:
/// a wrong password and a corrupted ciphertext must be indistinguishable
/// to the caller.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed")]
    Authentication,

    #[error("key unwrap failed")]
    KeyUnwrap,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid public key")]
    InvalidPublicKey,
}
