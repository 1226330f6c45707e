use chrono::Utc;

use crate::consensus::peers::{PeerAddress, PeerAddressError, PeerSet};
use crate::transaction::Transaction;

use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

/// The in-memory ledger: the chain itself, the pool of transactions not
/// yet sealed into a block, and the set of known peer nodes.
///
/// The ledger assumes at most one active mutator; the surrounding API
/// layer serializes access with a mutex. Nothing here is persisted, the
/// chain lives and dies with the process.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: PeerSet,
}

impl Ledger {
    /// Build a ledger holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            peers: PeerSet::new(),
        };
        ledger.new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        ledger
    }

    /// Queue a transaction for inclusion in the next sealed block and
    /// return the index that block will have.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.chain.len() as u64 + 1
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// The pool's transactions move into the block, so later submissions
    /// cannot alter a sealed block, and the pool is left empty. When
    /// `previous_hash` is not supplied it is computed from the current
    /// tip. The proof is trusted as given; obtaining one that satisfies
    /// the proof-of-work predicate against the tip is the caller's job.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block().hash(),
        };

        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: Utc::now().timestamp(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        self.chain.push(block);
        self.last_block()
    }

    /// The chain tip.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Replace the local chain with `candidate` if it is strictly longer.
    /// Returns whether the replacement happened. The candidate is assumed
    /// to have passed chain validation already.
    pub fn adopt_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() > self.chain.len() {
            self.chain = candidate;
            true
        } else {
            false
        }
    }

    /// Normalize `address` to its host:port identity and add it to the
    /// peer set. Registering the same identity twice is a no-op.
    pub fn register_node(&mut self, address: &str) -> Result<PeerAddress, PeerAddressError> {
        let peer = PeerAddress::parse(address)?;
        self.add_peer(peer.clone());
        Ok(peer)
    }

    /// Add an already-normalized peer; returns false if it was known.
    pub fn add_peer(&mut self, peer: PeerAddress) -> bool {
        self.peers.insert(peer)
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
