//! Recipient-bound encrypted shares.
//!
//! The sender encrypts the note content under the pairwise X25519 secret
//! before calling in; this controller never sees plaintext or key material.
//! Each stored ciphertext is decryptable by exactly one recipient's secret
//! key combined with the embedded sender public key — compromising one
//! pairwise secret exposes nothing encrypted for anyone else.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use vn_store::models::{E2eeShareDetailRow, E2eeShareRow};
use vn_store::Store;

use crate::error::ServiceError;

pub const DEFAULT_SHARE_DURATION_HOURS: i64 = 24;

#[derive(Clone)]
pub struct ExchangeService {
    store: Store,
}

#[derive(Debug, Clone)]
pub struct NewShare {
    pub recipient_username: String,
    /// Sender's X25519 public key, base64 — embedded in the share so the
    /// recipient can derive the secret even after the sender republishes.
    pub sender_public_key: String,
    pub ciphertext: String,
    pub iv: String,
    /// `None` or non-positive falls back to the 24 h default.
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedShare {
    pub share_id: String,
    pub recipient_username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareView {
    pub id: String,
    pub note_title: String,
    pub sender_username: String,
    pub sender_public_key: String,
    pub ciphertext: String,
    pub iv: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ExchangeService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_share(
        &self,
        note_id: &str,
        sender_id: &str,
        share: NewShare,
    ) -> Result<CreatedShare, ServiceError> {
        if share.recipient_username.is_empty() {
            return Err(ServiceError::MissingField("recipient username"));
        }
        if share.sender_public_key.is_empty() {
            return Err(ServiceError::MissingField("sender public key"));
        }
        if share.ciphertext.is_empty() {
            return Err(ServiceError::MissingField("ciphertext"));
        }
        if share.iv.is_empty() {
            return Err(ServiceError::MissingField("iv"));
        }
        vn_crypto::exchange::decode_public_key(&share.sender_public_key)
            .map_err(|_| ServiceError::InvalidPublicKey)?;

        self.store
            .note_for_owner(note_id, sender_id)
            .await?
            .ok_or(ServiceError::NotFound("note"))?;

        let recipient = self
            .store
            .user_by_username(&share.recipient_username)
            .await?
            .ok_or(ServiceError::NotFound("recipient"))?;
        if recipient.id == sender_id {
            return Err(ServiceError::SelfShare);
        }

        let duration = match share.duration {
            Some(d) if d > Duration::zero() => d,
            _ => Duration::hours(DEFAULT_SHARE_DURATION_HOURS),
        };

        let now = Utc::now();
        let row = E2eeShareRow {
            id: Uuid::new_v4().to_string(),
            note_id: note_id.to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient.id,
            sender_pubkey: share.sender_public_key,
            ciphertext: share.ciphertext,
            iv: share.iv,
            expires_at: now + duration,
            created_at: now,
        };
        self.store.insert_e2ee_share(&row).await?;

        info!(
            note_id,
            recipient = %recipient.username,
            expires_at = %row.expires_at,
            "exchange share created"
        );

        Ok(CreatedShare {
            share_id: row.id,
            recipient_username: recipient.username,
            expires_at: row.expires_at,
        })
    }

    /// Live shares addressed to the caller, newest first.
    pub async fn list_shares(&self, recipient_id: &str) -> Result<Vec<ShareView>, ServiceError> {
        let rows = self
            .store
            .e2ee_shares_for_recipient(recipient_id, Utc::now())
            .await?;
        Ok(rows.into_iter().map(view_of).collect())
    }

    pub async fn get_share(
        &self,
        share_id: &str,
        recipient_id: &str,
    ) -> Result<ShareView, ServiceError> {
        let row = self
            .store
            .e2ee_share_detail(share_id)
            .await?
            .ok_or(ServiceError::NotFound("share"))?;

        if row.recipient_id != recipient_id {
            return Err(ServiceError::Forbidden("share"));
        }

        if Utc::now() >= row.expires_at {
            self.store.delete_e2ee_share(&row.id).await?;
            info!(share_id, "expired exchange share removed on read");
            return Err(ServiceError::Gone);
        }

        Ok(view_of(row))
    }

    /// Only the original sender may revoke a share.
    pub async fn delete_share(
        &self,
        share_id: &str,
        sender_id: &str,
    ) -> Result<(), ServiceError> {
        let row = self
            .store
            .e2ee_share_by_id(share_id)
            .await?
            .ok_or(ServiceError::NotFound("share"))?;

        if row.sender_id != sender_id {
            return Err(ServiceError::Forbidden("share"));
        }

        self.store.delete_e2ee_share(&row.id).await?;
        info!(share_id, "exchange share revoked by sender");
        Ok(())
    }
}

fn view_of(row: E2eeShareDetailRow) -> ShareView {
    ShareView {
        id: row.id,
        note_title: row.note_title,
        sender_username: row.sender_username,
        sender_public_key: row.sender_pubkey,
        ciphertext: row.ciphertext,
        iv: row.iv,
        expires_at: row.expires_at,
        created_at: row.created_at,
    }
}
