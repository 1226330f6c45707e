use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consensus::HttpChainFetcher;
use crate::ledger::{Block, Ledger};
use crate::transaction::Transaction;

/// Shared application state: the in-memory ledger (chain, pending pool
/// and peer set) plus this node's identity and its peer-fetch client.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub fetcher: HttpChainFetcher,
    /// Identifier credited by mining rewards; a fresh UUID per process.
    pub node_id: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            fetcher: HttpChainFetcher::new(),
            node_id: Uuid::new_v4().simple().to_string(),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: &'static str,
    pub replaced: bool,
    pub length: usize,
    pub chain: Vec<Block>,
}

/* ---------- Stats ---------- */

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub pending_transactions: usize,
    pub peers: usize,
}
