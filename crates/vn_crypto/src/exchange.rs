//! X25519 pairwise key agreement.
//!
//! Two parties each publish a 32-byte Curve25519 public key; either side
//! combines its own secret with the other's public key and lands on the
//! same shared key.  The raw ECDH output is never used directly as a
//! symmetric key — it is digested through SHA-256 first, which gives a
//! uniformly distributed 32-byte key whatever the curve's output looks like.
//!
//! The shared key zeroizes on drop; callers hold it only for the duration
//! of one encrypt/decrypt.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;

/// An X25519 keypair.  The secret half never leaves the process that
/// generated it; only the public half is published.
pub struct KeyPair {
    pub secret: StaticSecret,
    pub public: PublicKey,
}

/// 32-byte symmetric key agreed between two parties. Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct SharedKey(pub [u8; 32]);

/// Generate a fresh X25519 keypair.
pub fn generate_keypair() -> KeyPair {
    let secret = StaticSecret::random_from_rng(OsRng);
    let public = PublicKey::from(&secret);
    KeyPair { secret, public }
}

/// Derive the pairwise shared key from our secret and their public key.
///
/// Rejects degenerate all-zero ECDH outputs (low-order peer points) as
/// `InvalidPublicKey` — a key agreement the peer did not contribute to is
/// not an agreement.
pub fn shared_secret(secret: &StaticSecret, public: &PublicKey) -> Result<SharedKey, CryptoError> {
    let dh = secret.diffie_hellman(public);
    if !dh.was_contributory() {
        return Err(CryptoError::InvalidPublicKey);
    }
    let digest = Sha256::digest(dh.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    Ok(SharedKey(key))
}

/// Base64url-encode a public key for publication.
pub fn encode_public_key(public: &PublicKey) -> String {
    URL_SAFE_NO_PAD.encode(public.as_bytes())
}

/// Parse a published public key.  Fails with `InvalidPublicKey` on bad
/// encoding or a length other than 32 bytes.
pub fn decode_public_key(encoded: &str) -> Result<PublicKey, CryptoError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    Ok(PublicKey::from(bytes))
}
