//! Database row models — these map to/from SQL rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    /// PHC-string login digest — never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Base64 X25519 public key, if the user has published one.
    pub dh_public_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NoteRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// AEAD ciphertext of the note body, base64 (opaque to the server).
    pub ciphertext: String,
    pub iv: String,
    /// The note's DEK, AEAD-encrypted under the owner's KEK.
    pub wrapped_key: String,
    pub wrapped_key_iv: String,
    pub created_at: DateTime<Utc>,
}

/// A note joined with its owner's username, for share-access views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NoteWithOwnerRow {
    pub id: String,
    pub title: String,
    pub ciphertext: String,
    pub iv: String,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShareLinkRow {
    pub id: String,
    pub note_id: String,
    pub owner_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// 0 = unlimited.
    pub max_access_count: i64,
    /// Monotonic; only ever incremented by the atomic consume.
    pub access_count: i64,
    pub require_password: bool,
    #[serde(skip_serializing)]
    pub password_digest: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct E2eeShareRow {
    pub id: String,
    pub note_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    /// Sender's X25519 public key, base64 — embedded so the recipient can
    /// derive the pairwise secret even after the sender republishes.
    pub sender_pubkey: String,
    pub ciphertext: String,
    pub iv: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// An exchange share joined with note title and sender username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct E2eeShareDetailRow {
    pub id: String,
    pub note_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub note_title: String,
    pub sender_username: String,
    pub sender_pubkey: String,
    pub ciphertext: String,
    pub iv: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
