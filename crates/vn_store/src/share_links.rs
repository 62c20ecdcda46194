use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::error::StoreError;
use crate::models::ShareLinkRow;

impl Store {
    pub async fn insert_share_link(&self, link: &ShareLinkRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO share_links
                 (id, note_id, owner_id, token, expires_at, max_access_count,
                  access_count, require_password, password_digest, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&link.id)
        .bind(&link.note_id)
        .bind(&link.owner_id)
        .bind(&link.token)
        .bind(link.expires_at)
        .bind(link.max_access_count)
        .bind(link.access_count)
        .bind(link.require_password)
        .bind(&link.password_digest)
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn share_link_by_token(
        &self,
        token: &str,
    ) -> Result<Option<ShareLinkRow>, StoreError> {
        let row = sqlx::query_as::<_, ShareLinkRow>("SELECT * FROM share_links WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Atomically claim one access on a live link.
    ///
    /// Expiry, quota check and counter increment happen in a single
    /// conditional UPDATE, so two concurrent accessors of a
    /// `max_access_count = 1` link can never both succeed — the loser sees
    /// 0 rows affected and re-classifies.  A read-then-write here would be
    /// the race the whole controller is built to avoid.
    pub async fn consume_share_link(
        &self,
        link_id: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE share_links
                SET access_count = access_count + 1
              WHERE id = ?
                AND expires_at > ?
                AND (max_access_count = 0 OR access_count < max_access_count)",
        )
        .bind(link_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_share_link(&self, link_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM share_links WHERE id = ?")
            .bind(link_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bulk revoke: every link for the note, live or dead.
    pub async fn delete_links_for_note(&self, note_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM share_links WHERE note_id = ?")
            .bind(note_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ── Reaper predicates ────────────────────────────────────────────────────

    pub async fn reap_expired_links(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM share_links WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn reap_exhausted_links(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM share_links
              WHERE max_access_count > 0 AND access_count >= max_access_count",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
