//! The closed error taxonomy of the sharing engine.
//!
//! Every variant is terminal for the current request; nothing here is
//! retried internally.  Boundary layers map variants to status codes and
//! messages — behavior must never be dispatched on message text.

use thiserror::Error;
use vn_crypto::CryptoError;
use vn_store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("no access to this {0}")]
    Forbidden(&'static str),

    #[error("share link has expired")]
    Expired,

    #[error("share link has reached its maximum access count")]
    Exhausted,

    /// Time-based death of an exchange share observed on read.
    #[error("share has expired")]
    Gone,

    #[error("password required to access this share")]
    PasswordRequired,

    #[error("incorrect password")]
    InvalidPassword,

    #[error("cannot share a note with yourself")]
    SelfShare,

    #[error("username already taken")]
    UsernameTaken,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
