//! Self-service share links: bearer tokens gated by expiry, an optional
//! password and an optional access quota.
//!
//! A link moves through Active → (counted accesses) → Exhausted or Expired
//! → Deleted, and never back.  Dead links are deleted on the access path
//! itself, so the background reaper is an optimization, not a correctness
//! requirement: read queries filtering on `expires_at > now` stay correct
//! even if it never runs.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use vn_store::models::ShareLinkRow;
use vn_store::Store;

use crate::error::ServiceError;

pub const DEFAULT_LINK_DURATION_HOURS: i64 = 24;

#[derive(Clone)]
pub struct ShareLinkService {
    store: Store,
}

/// Owner-chosen policy for a new link.
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    /// Non-positive durations fall back to the 24 h default.
    pub duration: Duration,
    /// Stored only as a PHC digest.
    pub password: Option<String>,
    /// `<= 0` means unlimited.
    pub max_access_count: i64,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            duration: Duration::hours(DEFAULT_LINK_DURATION_HOURS),
            password: None,
            max_access_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedLink {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub max_access_count: i64,
    pub require_password: bool,
}

/// What a successful access returns: ciphertext and metadata, never the
/// wrapped DEK — the decryption key travels out-of-band (URL fragment).
#[derive(Debug, Clone, Serialize)]
pub struct SharedNoteView {
    pub note_id: String,
    pub title: String,
    pub ciphertext: String,
    pub iv: String,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ShareLinkService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Issue a new link for the owner's note.
    pub async fn create_link(
        &self,
        note_id: &str,
        owner_id: &str,
        policy: LinkPolicy,
    ) -> Result<CreatedLink, ServiceError> {
        self.store
            .note_for_owner(note_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound("note"))?;

        let duration = if policy.duration <= Duration::zero() {
            Duration::hours(DEFAULT_LINK_DURATION_HOURS)
        } else {
            policy.duration
        };
        let max_access_count = policy.max_access_count.max(0);
        let password_digest = match policy.password.as_deref() {
            Some(password) if !password.is_empty() => Some(vn_crypto::password::hash(password)?),
            _ => None,
        };

        let now = Utc::now();
        let link = ShareLinkRow {
            id: Uuid::new_v4().to_string(),
            note_id: note_id.to_string(),
            owner_id: owner_id.to_string(),
            token: vn_crypto::token::generate(),
            expires_at: now + duration,
            max_access_count,
            access_count: 0,
            require_password: password_digest.is_some(),
            password_digest,
            created_at: now,
        };
        self.store.insert_share_link(&link).await?;

        info!(
            note_id,
            expires_at = %link.expires_at,
            max_access = link.max_access_count,
            password_protected = link.require_password,
            "share link created"
        );

        Ok(CreatedLink {
            token: link.token,
            expires_at: link.expires_at,
            max_access_count: link.max_access_count,
            require_password: link.require_password,
        })
    }

    /// Redeem a token.
    ///
    /// Transition order is fixed: absent, expired (delete), exhausted
    /// (delete), password gate, then the atomic counter claim.  Failed
    /// password attempts never consume quota — a guesser must not be able
    /// to lock the owner out of their own link.
    pub async fn access_link(
        &self,
        token: &str,
        password: Option<&str>,
    ) -> Result<SharedNoteView, ServiceError> {
        let now = Utc::now();
        let link = self
            .store
            .share_link_by_token(token)
            .await?
            .ok_or(ServiceError::NotFound("share link"))?;

        if now >= link.expires_at {
            self.store.delete_share_link(&link.id).await?;
            info!(note_id = %link.note_id, "expired share link removed on access");
            return Err(ServiceError::Expired);
        }

        if link.max_access_count > 0 && link.access_count >= link.max_access_count {
            self.store.delete_share_link(&link.id).await?;
            info!(note_id = %link.note_id, "exhausted share link removed on access");
            return Err(ServiceError::Exhausted);
        }

        if link.require_password {
            let supplied = match password {
                Some(p) if !p.is_empty() => p,
                _ => return Err(ServiceError::PasswordRequired),
            };
            let digest = link.password_digest.as_deref().unwrap_or_default();
            if !vn_crypto::password::verify(supplied, digest) {
                return Err(ServiceError::InvalidPassword);
            }
        }

        if self.store.consume_share_link(&link.id, now).await? == 0 {
            // Lost a race with a concurrent accessor (or the clock ran out
            // under us).  Re-read and classify; never report two successes
            // against one quota slot.
            return match self.store.share_link_by_token(token).await? {
                Some(current) => {
                    self.store.delete_share_link(&current.id).await?;
                    if now >= current.expires_at {
                        Err(ServiceError::Expired)
                    } else {
                        Err(ServiceError::Exhausted)
                    }
                }
                None => Err(ServiceError::NotFound("share link")),
            };
        }

        let note = self
            .store
            .note_with_owner(&link.note_id)
            .await?
            .ok_or(ServiceError::NotFound("note"))?;

        Ok(SharedNoteView {
            note_id: note.id,
            title: note.title,
            ciphertext: note.ciphertext,
            iv: note.iv,
            owner_username: note.owner_username,
            created_at: note.created_at,
            expires_at: link.expires_at,
        })
    }

    /// Delete every link for the note, live or dead.  Idempotent: revoking
    /// a note with no links returns 0.
    pub async fn revoke_all(&self, note_id: &str, owner_id: &str) -> Result<u64, ServiceError> {
        self.store
            .note_for_owner(note_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound("note"))?;

        let revoked = self.store.delete_links_for_note(note_id).await?;
        if revoked > 0 {
            info!(note_id, revoked, "share links revoked");
        }
        Ok(revoked)
    }
}
