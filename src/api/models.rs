use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::{Block, SharedLedger};
use crate::config::Config;

/// Shared application state around the single in-memory ledger.
pub struct AppState {
    pub ledger: SharedLedger,
    pub mining_timeout: Duration,
    pub max_api_difficulty: u32,
}

impl AppState {
    pub fn new(ledger: SharedLedger, config: &Config) -> Self {
        Self {
            ledger,
            mining_timeout: config.mining_timeout,
            max_api_difficulty: config.max_api_difficulty,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: u32,
    pub total_difficulty: u64,
    pub chain: Vec<Block>,
}

#[derive(Deserialize)]
pub struct NewBlockRequest {
    pub data: serde_json::Value,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    /// Present when `valid` is false.
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

#[derive(Deserialize)]
pub struct SetDifficultyRequest {
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: u32,
    pub total_difficulty: u64,
    pub last_interval_secs: Option<i64>,
}
