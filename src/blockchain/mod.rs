pub mod block;
pub mod error;
pub mod hasher;
pub mod model;
pub mod pow;
pub mod shared;

pub use block::{Block, Payload};
pub use error::{BlockError, ChainError, LedgerError, MiningError};
pub use model::{Accepted, Ledger};
pub use pow::CancelToken;
pub use shared::SharedLedger;

/// Default Proof-of-Work difficulty (number of leading zero bits).
pub const DEFAULT_DIFFICULTY: u32 = 16;

/// Payload every valid chain must carry in its genesis block.
pub const DEFAULT_GENESIS_DATA: &str = "genesis block";

/// `previous_hash` of the genesis block. Never a valid 64-char hex digest.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A SHA-256 digest has 256 bits; no proof can satisfy more.
pub const MAX_DIFFICULTY: u32 = 256;
