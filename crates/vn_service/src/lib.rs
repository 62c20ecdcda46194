//! vn_service — VeilNote's confidential-sharing engine
//!
//! Controllers over [`vn_store::Store`]:
//! - `notes`      — ciphertext note records with wrapped keys
//! - `share_link` — the token/expiry/password/quota state machine
//! - `exchange`   — recipient-bound pairwise-encrypted shares
//! - `directory`  — user records and the public-key directory
//! - `reaper`     — background sweep of dead share records
//!
//! Each inbound request runs on its own worker with no shared in-memory
//! mutable state; the store's transactional guarantees carry all the
//! cross-request invariants.  Transport (HTTP, IPC) and token issuance are
//! collaborators layered on top of these controllers, not part of them.

pub mod directory;
pub mod error;
pub mod exchange;
pub mod notes;
pub mod reaper;
pub mod share_link;

pub use directory::Directory;
pub use error::ServiceError;
pub use exchange::ExchangeService;
pub use notes::NoteService;
pub use share_link::ShareLinkService;
