pub mod block;
pub mod model;
pub mod pow;
pub mod validate;

pub use block::Block;
pub use model::Ledger;

/// Hex prefix a double-SHA-256 digest must carry for a proof to count
/// (difficulty target: 4 leading hex zeros).
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Sentinel previous_hash of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sender identifier used for the mining reward transaction.
pub const MINING_SENDER: &str = "0";

/// Amount credited to the miner per sealed block.
pub const MINING_REWARD: u64 = 1;
