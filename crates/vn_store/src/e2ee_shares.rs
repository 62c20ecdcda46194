use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::error::StoreError;
use crate::models::{E2eeShareDetailRow, E2eeShareRow};

const DETAIL_SELECT: &str = "SELECT s.id, s.note_id, s.sender_id, s.recipient_id,
        n.title AS note_title, u.username AS sender_username,
        s.sender_pubkey, s.ciphertext, s.iv, s.expires_at, s.created_at
   FROM e2ee_shares s
   INNER JOIN notes n ON n.id = s.note_id
   INNER JOIN users u ON u.id = s.sender_id";

impl Store {
    pub async fn insert_e2ee_share(&self, share: &E2eeShareRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO e2ee_shares
                 (id, note_id, sender_id, recipient_id, sender_pubkey,
                  ciphertext, iv, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&share.id)
        .bind(&share.note_id)
        .bind(&share.sender_id)
        .bind(&share.recipient_id)
        .bind(&share.sender_pubkey)
        .bind(&share.ciphertext)
        .bind(&share.iv)
        .bind(share.expires_at)
        .bind(share.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn e2ee_share_by_id(&self, id: &str) -> Result<Option<E2eeShareRow>, StoreError> {
        let row = sqlx::query_as::<_, E2eeShareRow>("SELECT * FROM e2ee_shares WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn e2ee_share_detail(
        &self,
        id: &str,
    ) -> Result<Option<E2eeShareDetailRow>, StoreError> {
        let query = format!("{DETAIL_SELECT} WHERE s.id = ?");
        let row = sqlx::query_as::<_, E2eeShareDetailRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Live shares addressed to the recipient, newest first.
    pub async fn e2ee_shares_for_recipient(
        &self,
        recipient_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<E2eeShareDetailRow>, StoreError> {
        let query = format!(
            "{DETAIL_SELECT} WHERE s.recipient_id = ? AND s.expires_at > ?
             ORDER BY s.created_at DESC"
        );
        let rows = sqlx::query_as::<_, E2eeShareDetailRow>(&query)
            .bind(recipient_id)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn delete_e2ee_share(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM e2ee_shares WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn reap_expired_e2ee_shares(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM e2ee_shares WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
