use chrono::{DateTime, Utc};

use crate::db::Store;
use crate::error::StoreError;
use crate::models::{NoteRow, NoteWithOwnerRow};

impl Store {
    pub async fn insert_note(&self, note: &NoteRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO notes (id, owner_id, title, ciphertext, iv, wrapped_key, wrapped_key_iv, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&note.id)
        .bind(&note.owner_id)
        .bind(&note.title)
        .bind(&note.ciphertext)
        .bind(&note.iv)
        .bind(&note.wrapped_key)
        .bind(&note.wrapped_key_iv)
        .bind(note.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetch a note scoped to its owner.  A wrong owner reads the same as an
    /// absent note.
    pub async fn note_for_owner(
        &self,
        note_id: &str,
        owner_id: &str,
    ) -> Result<Option<NoteRow>, StoreError> {
        let row = sqlx::query_as::<_, NoteRow>("SELECT * FROM notes WHERE id = ? AND owner_id = ?")
            .bind(note_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn notes_for_owner(&self, owner_id: &str) -> Result<Vec<NoteRow>, StoreError> {
        let rows = sqlx::query_as::<_, NoteRow>(
            "SELECT * FROM notes WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Note joined with its owner's username — the shape returned to share
    /// accessors (no wrapped key).
    pub async fn note_with_owner(
        &self,
        note_id: &str,
    ) -> Result<Option<NoteWithOwnerRow>, StoreError> {
        let row = sqlx::query_as::<_, NoteWithOwnerRow>(
            "SELECT n.id, n.title, n.ciphertext, n.iv, n.created_at, u.username AS owner_username
             FROM notes n
             INNER JOIN users u ON u.id = n.owner_id
             WHERE n.id = ?",
        )
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Count of live share links for a note — the "is this note shared?"
    /// query.  Only rows with a future expiry count.
    pub async fn live_link_count(
        &self,
        note_id: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM share_links WHERE note_id = ? AND expires_at > ?",
        )
        .bind(note_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Delete an owner's note.  Share links and exchange shares go with it
    /// (FK cascade).  Returns rows affected.
    pub async fn delete_note(&self, note_id: &str, owner_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND owner_id = ?")
            .bind(note_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
