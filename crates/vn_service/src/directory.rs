//! User records and the public-key directory.
//!
//! A published X25519 key is the only channel through which others can
//! derive a pairwise secret with this user.  There is no rotation
//! protocol: a republish silently replaces the old key for future shares,
//! while existing shares keep the sender key embedded at creation time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use vn_store::models::UserRow;
use vn_store::Store;

use crate::error::ServiceError;

#[derive(Clone)]
pub struct Directory {
    store: Store,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Directory {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserView, ServiceError> {
        if username.is_empty() {
            return Err(ServiceError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(ServiceError::MissingField("password"));
        }
        if self.store.user_by_username(username).await?.is_some() {
            return Err(ServiceError::UsernameTaken);
        }

        let user = UserRow {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: vn_crypto::password::hash(password)?,
            dh_public_key: None,
            created_at: Utc::now(),
        };
        self.store.insert_user(&user).await?;
        Ok(UserView {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        })
    }

    /// The opaque `verify(password, digest)` gate.  An unknown username and
    /// a wrong password fail identically.
    pub async fn verify_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        let user = self
            .store
            .user_by_username(username)
            .await?
            .ok_or(ServiceError::InvalidPassword)?;
        if !vn_crypto::password::verify(password, &user.password_hash) {
            return Err(ServiceError::InvalidPassword);
        }
        Ok(user.id)
    }

    /// Publish (or replace) the caller's X25519 public key.
    pub async fn publish_key(
        &self,
        user_id: &str,
        public_key: &str,
    ) -> Result<(), ServiceError> {
        vn_crypto::exchange::decode_public_key(public_key)
            .map_err(|_| ServiceError::InvalidPublicKey)?;
        if self.store.set_public_key(user_id, public_key).await? == 0 {
            return Err(ServiceError::NotFound("user"));
        }
        Ok(())
    }

    /// Fetch another user's published key for a pairwise exchange.
    pub async fn lookup_key(&self, username: &str) -> Result<String, ServiceError> {
        let user = self
            .store
            .user_by_username(username)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;
        user.dh_public_key
            .ok_or(ServiceError::NotFound("public key"))
    }
}
