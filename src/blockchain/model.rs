use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::{BlockError, ChainError, MiningError};
use super::pow::CancelToken;
use super::{Block, GENESIS_PREVIOUS_HASH, Payload};

/// Outcome of an accepted chain replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub previous_work: u64,
    pub new_work: u64,
    pub length: usize,
}

/// In-memory ledger of proof-of-work blocks.
///
/// Index 0 is genesis. The chain only grows through [`Ledger::append`] and is
/// only ever swapped wholesale for a heavier valid chain.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    difficulty: u32,
    genesis_payload: Payload,
}

impl Ledger {
    /// An empty ledger. Mint and append a genesis block before anything else,
    /// or use [`Ledger::bootstrap`].
    pub fn new(difficulty: u32, genesis_payload: Payload) -> Self {
        Self {
            chain: Vec::new(),
            difficulty,
            genesis_payload,
        }
    }

    /// Initialize a ledger and mine its genesis block.
    pub fn bootstrap(
        difficulty: u32,
        genesis_payload: Payload,
        cancel: &CancelToken,
    ) -> Result<Self, MiningError> {
        let mut ledger = Self::new(difficulty, genesis_payload);
        let genesis = ledger.generate_genesis(cancel)?;
        ledger.chain.push(genesis);
        Ok(ledger)
    }

    pub fn generate_genesis(&self, cancel: &CancelToken) -> Result<Block, MiningError> {
        Block::mint(None, self.genesis_payload.clone(), self.difficulty, cancel)
    }

    /// Mint the block that would follow the current head. Does not append.
    pub fn generate_next(
        &self,
        payload: Payload,
        cancel: &CancelToken,
    ) -> Result<Block, MiningError> {
        Block::mint(self.last_block(), payload, self.difficulty, cancel)
    }

    /// Append `block` if it correctly extends the chain.
    pub fn append(&mut self, block: Block) -> Result<(), BlockError> {
        match self.last_block() {
            None if block.index == 0 => {}
            None => {
                return Err(BlockError::InvalidIndex {
                    expected: 0,
                    found: block.index,
                });
            }
            Some(last) => {
                if let Err(e) = Self::validate_next(&block, last) {
                    warn!("rejected block #{}: {}", block.index, e);
                    return Err(e);
                }
            }
        }
        info!("appended block #{} (hash={})", block.index, block.hash);
        self.chain.push(block);
        Ok(())
    }

    /// Check `candidate` as the successor of `previous`.
    ///
    /// Order: index, linkage, hash recomputation, puzzle. Stops at the first failure.
    pub fn validate_next(candidate: &Block, previous: &Block) -> Result<(), BlockError> {
        let expected = previous.index + 1;
        if candidate.index != expected {
            return Err(BlockError::InvalidIndex {
                expected,
                found: candidate.index,
            });
        }
        if candidate.previous_hash != previous.hash {
            return Err(BlockError::InvalidLinkage);
        }
        if candidate.compute_hash() != candidate.hash {
            return Err(BlockError::HashMismatch);
        }
        if !candidate.has_valid_proof() {
            return Err(BlockError::PuzzleUnsatisfied {
                difficulty: candidate.difficulty,
            });
        }
        Ok(())
    }

    pub fn is_valid_next(candidate: &Block, previous: &Block) -> bool {
        Self::validate_next(candidate, previous).is_ok()
    }

    /// Validate a full chain against this ledger's genesis.
    pub fn validate_chain(&self, chain: &[Block]) -> Result<(), ChainError> {
        let genesis = chain.first().ok_or(ChainError::EmptyChain)?;
        if genesis.index != 0
            || genesis.previous_hash != GENESIS_PREVIOUS_HASH
            || genesis.payload != self.genesis_payload
        {
            return Err(ChainError::InvalidBlock {
                index: 0,
                reason: BlockError::GenesisMismatch,
            });
        }
        // genesis difficulty counts toward chain weight; its hash and proof must hold
        if genesis.compute_hash() != genesis.hash {
            return Err(ChainError::InvalidBlock {
                index: 0,
                reason: BlockError::HashMismatch,
            });
        }
        if !genesis.has_valid_proof() {
            return Err(ChainError::InvalidBlock {
                index: 0,
                reason: BlockError::PuzzleUnsatisfied {
                    difficulty: genesis.difficulty,
                },
            });
        }

        for (i, pair) in chain.windows(2).enumerate() {
            Self::validate_next(&pair[1], &pair[0]).map_err(|reason| ChainError::InvalidBlock {
                index: i + 1,
                reason,
            })?;
        }
        Ok(())
    }

    pub fn is_valid_chain(&self, chain: &[Block]) -> bool {
        self.validate_chain(chain).is_ok()
    }

    /// Cumulative difficulty of `chain`; the fork-choice weight.
    pub fn total_difficulty(chain: &[Block]) -> u64 {
        chain.iter().map(|b| u64::from(b.difficulty)).sum()
    }

    /// Adopt `candidate` if it is valid and carries strictly more work.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> Result<Accepted, ChainError> {
        if let Err(e) = self.validate_chain(&candidate) {
            warn!("Received blockchain invalid: {e}");
            return Err(e);
        }

        let current = Self::total_difficulty(&self.chain);
        let offered = Self::total_difficulty(&candidate);
        if offered <= current {
            warn!("Received blockchain not heavier (current={current}, candidate={offered})");
            return Err(ChainError::NotHeavierChain {
                current,
                candidate: offered,
            });
        }

        info!(
            "Received blockchain is valid. Replacing {} blocks (work {}) with {} (work {})",
            self.chain.len(),
            current,
            candidate.len(),
            offered
        );
        let length = candidate.len();
        self.chain = candidate;
        Ok(Accepted {
            previous_work: current,
            new_work: offered,
            length,
        })
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.chain.last()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn genesis_payload(&self) -> &Payload {
        &self.genesis_payload
    }

    pub fn set_difficulty(&mut self, difficulty: u32) {
        // NOTE: Changing difficulty affects future blocks only.
        self.difficulty = difficulty;
    }
}
