use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::{BlockError, ChainError, LedgerError};
use super::pow::CancelToken;
use super::{Accepted, Block, Ledger, Payload};

/// Head and difficulty captured under the lock, used to mine without holding it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub head: Option<Block>,
    pub difficulty: u32,
}

/// Cloneable handle to a single [`Ledger`] shared by HTTP and peer-sync callers.
///
/// Every mutation happens under one mutex. Mining never does: it works
/// from a [`Snapshot`] and the result is re-validated against the live head.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // A panic elsewhere cannot leave a half-appended block behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with read access to the ledger.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> Snapshot {
        let ledger = self.lock();
        Snapshot {
            head: ledger.last_block().cloned(),
            difficulty: ledger.difficulty(),
        }
    }

    /// Mine a block carrying `payload` and append it.
    ///
    /// If the head moved while mining, the block is discarded and mined
    /// again on top of the new head, until it sticks or `cancel` fires.
    /// An empty ledger first gets its configured genesis block.
    pub fn mine_and_append(
        &self,
        payload: Payload,
        cancel: &CancelToken,
    ) -> Result<Block, LedgerError> {
        loop {
            let snapshot = self.snapshot();
            let (block_payload, is_genesis) = match snapshot.head {
                Some(_) => (payload.clone(), false),
                None => (self.read(|l| l.genesis_payload().clone()), true),
            };
            let block = Block::mint(
                snapshot.head.as_ref(),
                block_payload,
                snapshot.difficulty,
                cancel,
            )?;

            let mut ledger = self.lock();
            let head_moved = ledger.last_block().map(|b| &b.hash)
                != snapshot.head.as_ref().map(|b| &b.hash);
            if head_moved {
                drop(ledger);
                warn!("head moved while mining block #{}; retrying", block.index);
                continue;
            }

            match ledger.append(block.clone()) {
                Ok(()) if is_genesis => debug!("minted genesis block on an empty ledger"),
                Ok(()) => return Ok(block),
                Err(e @ (BlockError::InvalidIndex { .. } | BlockError::InvalidLinkage)) => {
                    drop(ledger);
                    debug!("mined block no longer extends the head ({e}); retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn append(&self, block: Block) -> Result<(), BlockError> {
        self.lock().append(block)
    }

    pub fn replace_chain(&self, candidate: Vec<Block>) -> Result<Accepted, ChainError> {
        self.lock().replace_chain(candidate)
    }

    pub fn set_difficulty(&self, difficulty: u32) {
        self.lock().set_difficulty(difficulty);
    }

    pub fn last_block(&self) -> Option<Block> {
        self.lock().last_block().cloned()
    }

    pub fn chain(&self) -> Vec<Block> {
        self.lock().chain().to_vec()
    }
}
