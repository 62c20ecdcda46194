//! Note storage: opaque ciphertext blobs with their wrapped keys.
//!
//! Notes are immutable — there is no edit path.  Deleting a note takes its
//! share links and exchange shares with it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use vn_store::models::NoteRow;
use vn_store::Store;

use crate::error::ServiceError;

#[derive(Clone)]
pub struct NoteService {
    store: Store,
}

/// Everything the client uploads for a new note.  All fields are ciphertext
/// or nonces produced client-side; the server validates presence, nothing
/// more.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub ciphertext: String,
    pub iv: String,
    pub wrapped_key: String,
    pub wrapped_key_iv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub ciphertext: String,
    pub iv: String,
    pub wrapped_key: String,
    pub wrapped_key_iv: String,
    pub created_at: DateTime<Utc>,
    /// True when at least one share link with a future expiry exists.
    pub is_shared: bool,
}

impl NoteService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: &str, note: NewNote) -> Result<NoteView, ServiceError> {
        if note.title.is_empty() {
            return Err(ServiceError::MissingField("title"));
        }
        if note.ciphertext.is_empty() {
            return Err(ServiceError::MissingField("ciphertext"));
        }
        if note.iv.is_empty() {
            return Err(ServiceError::MissingField("iv"));
        }
        if note.wrapped_key.is_empty() {
            return Err(ServiceError::MissingField("wrapped key"));
        }
        if note.wrapped_key_iv.is_empty() {
            return Err(ServiceError::MissingField("wrapped key iv"));
        }

        let row = NoteRow {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: note.title,
            ciphertext: note.ciphertext,
            iv: note.iv,
            wrapped_key: note.wrapped_key,
            wrapped_key_iv: note.wrapped_key_iv,
            created_at: Utc::now(),
        };
        self.store.insert_note(&row).await?;
        Ok(view_of(row, false))
    }

    /// Owner's notes, newest first, each annotated with share liveness.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<NoteView>, ServiceError> {
        let now = Utc::now();
        let rows = self.store.notes_for_owner(owner_id).await?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let shared = self.store.live_link_count(&row.id, now).await? > 0;
            views.push(view_of(row, shared));
        }
        Ok(views)
    }

    pub async fn get(&self, owner_id: &str, note_id: &str) -> Result<NoteView, ServiceError> {
        let row = self
            .store
            .note_for_owner(note_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound("note"))?;
        let shared = self.store.live_link_count(&row.id, Utc::now()).await? > 0;
        Ok(view_of(row, shared))
    }

    pub async fn delete(&self, owner_id: &str, note_id: &str) -> Result<(), ServiceError> {
        let deleted = self.store.delete_note(note_id, owner_id).await?;
        if deleted == 0 {
            return Err(ServiceError::NotFound("note"));
        }
        Ok(())
    }
}

fn view_of(row: NoteRow, is_shared: bool) -> NoteView {
    NoteView {
        id: row.id,
        title: row.title,
        ciphertext: row.ciphertext,
        iv: row.iv,
        wrapped_key: row.wrapped_key,
        wrapped_key_iv: row.wrapped_key_iv,
        created_at: row.created_at,
        is_shared,
    }
}
