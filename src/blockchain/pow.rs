use log::{debug, info};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::MAX_DIFFICULTY;
use super::error::MiningError;

/// Attempts between two looks at the cancellation flag and deadline.
const CHECK_INTERVAL: u64 = 1024;

/// Cooperative stop signal for [`mine`]. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), MiningError> {
        if self.is_cancelled() {
            return Err(MiningError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(MiningError::TimedOut),
            _ => Ok(()),
        }
    }
}

/// Decide whether `proof` solves the puzzle posed by `challenge`.
///
/// `SHA-256(challenge || proof)` must start with `difficulty` zero bits.
/// Whole bytes are compared against `0x00`; when `difficulty` is not a
/// multiple of 8 the last inspected byte is masked to its top
/// `difficulty % 8` bits.
pub fn check(challenge: &str, proof: &str, difficulty: u32) -> bool {
    if difficulty > MAX_DIFFICULTY {
        return false;
    }

    let mut hasher = Sha256::new();
    hasher.update(challenge.as_bytes());
    hasher.update(proof.as_bytes());
    let digest = hasher.finalize();

    let needed_bytes = difficulty.div_ceil(8) as usize;
    let partial_bits = difficulty % 8;
    let partial_mask: u8 = if partial_bits == 0 {
        0xFF
    } else {
        0xFF << (8 - partial_bits)
    };

    digest[..needed_bytes]
        .iter()
        .enumerate()
        .all(|(i, byte)| {
            if i + 1 == needed_bytes {
                byte & partial_mask == 0
            } else {
                *byte == 0x00
            }
        })
}

/// Search for a proof of `challenge` at `difficulty`.
///
/// Proofs are decimal nonces tried in order from 0, so the result is
/// reproducible for a given challenge and difficulty. `cancel` is polled
/// every [`CHECK_INTERVAL`] attempts.
pub fn mine(
    challenge: &str,
    difficulty: u32,
    cancel: &CancelToken,
) -> Result<String, MiningError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(MiningError::DifficultyOutOfRange(difficulty));
    }

    debug!("Generating proof of work (difficulty={difficulty})...");
    let started = Instant::now();
    let mut nonce: u64 = 0;
    loop {
        let proof = nonce.to_string();
        if check(challenge, &proof, difficulty) {
            info!(
                "Found proper proof on iteration {} ({} ms)",
                nonce + 1,
                started.elapsed().as_millis()
            );
            return Ok(proof);
        }

        nonce = nonce.checked_add(1).ok_or(MiningError::Exhausted)?;
        if nonce % CHECK_INTERVAL == 0 {
            cancel.check()?;
            std::thread::yield_now();
        }
    }
}
