use thiserror::Error;

/// Why a single block was refused as the successor of another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("invalid index: expected {expected}, found {found}")]
    InvalidIndex { expected: u64, found: u64 },

    #[error("previous_hash does not match the hash of the preceding block")]
    InvalidLinkage,

    #[error("stored hash does not match the recomputed hash")]
    HashMismatch,

    #[error("proof does not satisfy difficulty {difficulty}")]
    PuzzleUnsatisfied { difficulty: u32 },

    #[error("genesis block does not match the configured genesis")]
    GenesisMismatch,
}

/// Why a whole chain was refused, either by validation or by fork choice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain has no genesis block")]
    EmptyChain,

    #[error("block #{index} is invalid: {reason}")]
    InvalidBlock { index: usize, reason: BlockError },

    #[error("candidate chain is not heavier (current work {current}, candidate work {candidate})")]
    NotHeavierChain { current: u64, candidate: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    #[error("mining cancelled")]
    Cancelled,

    #[error("mining deadline exceeded")]
    TimedOut,

    #[error("nonce space exhausted")]
    Exhausted,

    #[error("difficulty {0} is out of range (max 256 bits)")]
    DifficultyOutOfRange(u32),
}

/// Umbrella error for the mine-then-append path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
