//! vn_store — persistence for VeilNote's sharing engine
//!
//! # What the server holds
//! SQLite rows of ciphertext, nonces, wrapped keys and share policy — never
//! plaintext, never an unwrapped key.  Metadata needed for queries
//! (timestamps, owner ids, access counters) is stored in the clear.
//!
//! # Concurrency
//! No application-level locks.  `Store` is a cheap-clone pool handle and
//! every cross-request guarantee comes from SQLite's own transactional
//! behavior — in particular [`Store::consume_share_link`], the single
//! conditional UPDATE that makes quota enforcement race-free.
//!
//! # Migration
//! SQLx migrations in `migrations/` are run on open.

pub mod db;
pub mod error;
pub mod models;

mod e2ee_shares;
mod notes;
mod share_links;
mod users;

pub use db::Store;
pub use error::StoreError;
