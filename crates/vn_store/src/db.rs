//! Database abstraction over SQLite via sqlx.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};

use crate::error::StoreError;

/// Central store handle.  Cheap to clone (Arc internally).
#[derive(Clone)]
pub struct Store {
    pub(crate) pool: SqlitePool,
}

impl Store {
    /// Open (or create) the SQLite database at `db_path`.
    /// Runs all pending migrations automatically.
    ///
    /// WAL journal mode and foreign-key enforcement are configured at
    /// connection time here — NOT inside a migration, because SQLite forbids
    /// changing `journal_mode` inside a transaction and sqlx wraps every
    /// migration in one.  Foreign keys must be on for note deletion to
    /// cascade into share links and exchange shares.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::models::{NoteRow, ShareLinkRow, UserRow};
    use chrono::{Duration, Utc};

    async fn open_temp() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::open(&dir.path().join("veilnote.db"))
            .await
            .expect("open store");
        (store, dir)
    }

    #[tokio::test]
    async fn note_deletion_cascades_to_share_links() {
        let (store, _dir) = open_temp().await;
        let now = Utc::now();

        let user = UserRow {
            id: "u-1".into(),
            username: "alice".into(),
            password_hash: "digest".into(),
            dh_public_key: None,
            created_at: now,
        };
        store.insert_user(&user).await.expect("insert user");

        let note = NoteRow {
            id: "n-1".into(),
            owner_id: "u-1".into(),
            title: "t".into(),
            ciphertext: "ct".into(),
            iv: "iv".into(),
            wrapped_key: "wk".into(),
            wrapped_key_iv: "wkiv".into(),
            created_at: now,
        };
        store.insert_note(&note).await.expect("insert note");

        let link = ShareLinkRow {
            id: "l-1".into(),
            note_id: "n-1".into(),
            owner_id: "u-1".into(),
            token: "tok-1".into(),
            expires_at: now + Duration::hours(1),
            max_access_count: 0,
            access_count: 0,
            require_password: false,
            password_digest: None,
            created_at: now,
        };
        store.insert_share_link(&link).await.expect("insert link");

        let deleted = store.delete_note("n-1", "u-1").await.expect("delete note");
        assert_eq!(deleted, 1);
        assert!(store
            .share_link_by_token("tok-1")
            .await
            .expect("lookup")
            .is_none());
    }
}
