use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A single sealed block in the chain.
///
/// Blocks are immutable once appended: they record the pending
/// transactions that existed when the block was sealed, the proof found
/// for it, and the digest of the block before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Unix timestamp (UTC) at sealing time.
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    /// Digest of the previous block, or the genesis sentinel for block 1.
    pub previous_hash: String,
}

impl Block {
    /// Compute the SHA-256 hex digest of this block's canonical JSON
    /// serialization. Going through `serde_json::Value` sorts object keys,
    /// so two structurally identical blocks always hash identically.
    pub fn hash(&self) -> String {
        let value = serde_json::to_value(self).expect("block is JSON-serializable");
        let canonical = serde_json::to_string(&value).expect("JSON value serializes");
        let digest = Sha256::digest(canonical.as_bytes());
        hex::encode(digest)
    }
}
