//! Peer-sync message kinds and how the ledger answers them.
//!
//! There is no transport here; whatever carries these messages (the
//! `/sync/` HTTP route for now) hands them to [`handle`].

pub mod message;

pub use message::{Message, handle};
