use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GENESIS_PREVIOUS_HASH;
use super::error::MiningError;
use super::hasher;
use super::pow::{self, CancelToken};

/// Opaque application data carried by a block.
///
/// Any JSON value is accepted. Its canonical form (compact JSON, object keys
/// sorted) is what enters the block hash, so `{"a":1,"b":2}` and
/// `{"b":2,"a":1}` hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(serde_json::Value);

impl Payload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn canonical(&self) -> String {
        // serde_json's Map is a BTreeMap, so keys render in sorted order.
        self.0.to_string()
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(serde_json::Value::String(s.to_owned()))
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(serde_json::Value::String(s))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A single block of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub payload: Payload,
    pub difficulty: u32, // leading zero bits required of the proof
    pub hash: String,    // digest of the five fields above
    pub proof: String,   // solves the puzzle for (hash, difficulty)
}

impl Block {
    /// Build the successor of `previous` (or a genesis block when `None`),
    /// stamped with the current time, hashed and mined.
    pub fn mint(
        previous: Option<&Block>,
        payload: Payload,
        difficulty: u32,
        cancel: &CancelToken,
    ) -> Result<Self, MiningError> {
        Self::mint_at(previous, payload, difficulty, Utc::now().timestamp(), cancel)
    }

    /// Same as [`Block::mint`] with an explicit timestamp.
    pub fn mint_at(
        previous: Option<&Block>,
        payload: Payload,
        difficulty: u32,
        timestamp: i64,
        cancel: &CancelToken,
    ) -> Result<Self, MiningError> {
        let (index, previous_hash) = match previous {
            Some(prev) => (prev.index + 1, prev.hash.clone()),
            None => (0, GENESIS_PREVIOUS_HASH.to_string()),
        };
        let hash = hasher::digest(index, &previous_hash, timestamp, &payload, difficulty);
        let proof = pow::mine(&hash, difficulty, cancel)?;

        Ok(Self {
            index,
            previous_hash,
            timestamp,
            payload,
            difficulty,
            hash,
            proof,
        })
    }

    /// Recompute the hash from the block's own fields.
    pub fn compute_hash(&self) -> String {
        hasher::digest(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.payload,
            self.difficulty,
        )
    }

    /// Whether `proof` solves the puzzle for the stored hash and difficulty.
    pub fn has_valid_proof(&self) -> bool {
        pow::check(&self.hash, &self.proof, self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, Payload};
    use crate::blockchain::{CancelToken, GENESIS_PREVIOUS_HASH};
    use serde_json::json;

    #[test]
    fn genesis_uses_sentinel_linkage() {
        let b = Block::mint(None, "genesis block".into(), 8, &CancelToken::new()).unwrap();
        assert_eq!(b.index, 0);
        assert_eq!(b.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(b.hash, b.compute_hash());
        assert!(b.has_valid_proof());
    }

    #[test]
    fn successor_links_to_previous() {
        let token = CancelToken::new();
        let g = Block::mint(None, "genesis block".into(), 4, &token).unwrap();
        let b = Block::mint(Some(&g), json!({"k": [1, 2]}).into(), 6, &token).unwrap();
        assert_eq!(b.index, 1);
        assert_eq!(b.previous_hash, g.hash);
        assert_eq!(b.difficulty, 6);
        assert_eq!(b.hash, b.compute_hash());
        assert!(b.has_valid_proof());
    }

    #[test]
    fn mutated_payload_changes_recomputed_hash() {
        let mut b = Block::mint(None, "x".into(), 2, &CancelToken::new()).unwrap();
        let old = b.hash.clone();
        b.payload = Payload::from("y");
        assert_ne!(old, b.compute_hash());
    }

    #[test]
    fn block_serializes_with_hash_and_proof_as_strings() {
        let b = Block::mint_at(None, "g".into(), 0, 1_465_154_705, &CancelToken::new()).unwrap();
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["index"], 0);
        assert_eq!(v["previous_hash"], "0");
        assert_eq!(v["timestamp"], 1_465_154_705);
        assert_eq!(v["payload"], "g");
        assert!(v["hash"].is_string());
        assert_eq!(v["proof"], "0");

        let back: Block = serde_json::from_value(v).unwrap();
        assert_eq!(back, b);
    }
}
