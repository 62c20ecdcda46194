//! vn_crypto — VeilNote cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize all secret material on drop.
//! - Verification failures collapse to one generic error per operation so
//!   callers cannot be used as a decryption oracle.
//!
//! # Module layout
//! - `aead`     — XChaCha20-Poly1305 encrypt/decrypt helpers
//! - `envelope` — DEK wrap/unwrap under a password-derived KEK
//! - `kdf`      — Argon2id key derivation for the KEK
//! - `exchange` — X25519 pairwise key agreement
//! - `token`    — URL-safe random share tokens
//! - `password` — PHC-string password hash/verify
//! - `error`    — unified error type

pub mod aead;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod kdf;
pub mod password;
pub mod token;

pub use error::CryptoError;
