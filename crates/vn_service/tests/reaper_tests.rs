use chrono::{Duration, Utc};
use tempfile::TempDir;

use vn_service::reaper;
use vn_store::models::{E2eeShareRow, NoteRow, ShareLinkRow, UserRow};
use vn_store::Store;

async fn open_store() -> (Store, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(&dir.path().join("veilnote.db"))
        .await
        .expect("open store");
    (store, dir)
}

async fn seed_owner_and_note(store: &Store) -> (String, String) {
    let now = Utc::now();
    let user = UserRow {
        id: "u-owner".into(),
        username: "owner".into(),
        password_hash: "digest".into(),
        dh_public_key: None,
        created_at: now,
    };
    store.insert_user(&user).await.expect("insert user");

    let note = NoteRow {
        id: "n-1".into(),
        owner_id: user.id.clone(),
        title: "t".into(),
        ciphertext: "Y3Q".into(),
        iv: "aXY".into(),
        wrapped_key: "d2s".into(),
        wrapped_key_iv: "d2tpdg".into(),
        created_at: now,
    };
    store.insert_note(&note).await.expect("insert note");
    (user.id, note.id)
}

fn link(id: &str, note_id: &str, owner_id: &str, expires_at: chrono::DateTime<Utc>, max: i64, count: i64) -> ShareLinkRow {
    ShareLinkRow {
        id: id.into(),
        note_id: note_id.into(),
        owner_id: owner_id.into(),
        token: format!("token-{id}"),
        expires_at,
        max_access_count: max,
        access_count: count,
        require_password: false,
        password_digest: None,
        created_at: Utc::now(),
    }
}

fn share(id: &str, note_id: &str, user_id: &str, expires_at: chrono::DateTime<Utc>) -> E2eeShareRow {
    E2eeShareRow {
        id: id.into(),
        note_id: note_id.into(),
        sender_id: user_id.into(),
        recipient_id: user_id.into(),
        sender_pubkey: "cGs".into(),
        ciphertext: "Y3Q".into(),
        iv: "aXY".into(),
        expires_at,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn sweep_removes_only_dead_records() {
    let (store, _dir) = open_store().await;
    let (owner, note_id) = seed_owner_and_note(&store).await;
    let now = Utc::now();

    store
        .insert_share_link(&link("expired", &note_id, &owner, now - Duration::hours(1), 0, 4))
        .await
        .expect("insert");
    store
        .insert_share_link(&link("exhausted", &note_id, &owner, now + Duration::hours(1), 3, 3))
        .await
        .expect("insert");
    store
        .insert_share_link(&link("live", &note_id, &owner, now + Duration::hours(1), 3, 1))
        .await
        .expect("insert");
    store
        .insert_e2ee_share(&share("stale", &note_id, &owner, now - Duration::minutes(5)))
        .await
        .expect("insert");
    store
        .insert_e2ee_share(&share("fresh", &note_id, &owner, now + Duration::hours(2)))
        .await
        .expect("insert");

    reaper::sweep(&store).await;

    assert!(store.share_link_by_token("token-expired").await.unwrap().is_none());
    assert!(store.share_link_by_token("token-exhausted").await.unwrap().is_none());
    assert!(store.share_link_by_token("token-live").await.unwrap().is_some());
    assert!(store.e2ee_share_by_id("stale").await.unwrap().is_none());
    assert!(store.e2ee_share_by_id("fresh").await.unwrap().is_some());
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let (store, _dir) = open_store().await;
    let (owner, note_id) = seed_owner_and_note(&store).await;
    let now = Utc::now();

    store
        .insert_share_link(&link("expired", &note_id, &owner, now - Duration::hours(1), 0, 0))
        .await
        .expect("insert");

    reaper::sweep(&store).await;
    reaper::sweep(&store).await;

    assert!(store.share_link_by_token("token-expired").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_reaper_sweeps_immediately_and_shuts_down() {
    let (store, _dir) = open_store().await;
    let (owner, note_id) = seed_owner_and_note(&store).await;
    let now = Utc::now();

    store
        .insert_share_link(&link("expired", &note_id, &owner, now - Duration::hours(1), 0, 0))
        .await
        .expect("insert");

    // Interval far in the future: only the startup sweep can clean this up.
    let (handle, control) =
        reaper::spawn_reaper(store.clone(), std::time::Duration::from_secs(3600));

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(store.share_link_by_token("token-expired").await.unwrap().is_none());

    control.shutdown_tx.send(true).expect("signal shutdown");
    handle.await.expect("reaper exits cleanly");
}
