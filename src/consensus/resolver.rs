use std::sync::Mutex;

use futures_util::future::join_all;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::validate::valid_chain;
use crate::ledger::{Block, Ledger};

use super::peers::PeerAddress;

/// What a peer reports from its chain endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChain {
    pub length: usize,
    pub chain: Vec<Block>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("peer request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("peer answered with status {0}")]
    Status(u16),
}

/// Fetching a peer's chain, abstracted so conflict resolution can be
/// driven without a network in tests.
pub trait ChainFetcher {
    fn fetch_chain(
        &self,
        peer: &PeerAddress,
    ) -> impl Future<Output = Result<RemoteChain, FetchError>>;
}

/// Fetches peer chains over HTTP from the same endpoint this node serves.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpChainFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &PeerAddress) -> Result<RemoteChain, FetchError> {
        let url = format!("http://{peer}/api/v1/chain/");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        Ok(response.json::<RemoteChain>().await?)
    }
}

/// Longest-valid-chain conflict resolution.
///
/// Every registered peer is queried concurrently; a peer that is
/// unreachable, answers with an error, or reports a chain that fails
/// validation is skipped without affecting the rest of the scan. Among
/// the surviving candidates the running maximum length is tracked, so
/// the outcome does not depend on peer iteration order. The local chain
/// is replaced only by a strictly longer valid candidate; equal-length
/// chains are never adopted.
///
/// Returns whether the local chain was replaced.
pub async fn resolve_conflicts<F: ChainFetcher>(ledger: &Mutex<Ledger>, fetcher: &F) -> bool {
    let (peers, local_length) = {
        let ledger = ledger.lock().expect("mutex poisoned");
        let peers: Vec<PeerAddress> = ledger.peers().iter().cloned().collect();
        (peers, ledger.len())
    };
    debug!(
        "RESOLVE - scanning {} peer(s), local length {}",
        peers.len(),
        local_length
    );

    let results = join_all(peers.iter().map(|peer| fetcher.fetch_chain(peer))).await;

    let mut best: Option<Vec<Block>> = None;
    let mut max_length = local_length;

    for (peer, result) in peers.iter().zip(results) {
        let remote = match result {
            Ok(remote) => remote,
            Err(err) => {
                warn!("RESOLVE - skipping peer {peer}: {err}");
                continue;
            }
        };
        if remote.length != remote.chain.len() {
            warn!(
                "RESOLVE - skipping peer {peer}: reported length {} but sent {} blocks",
                remote.length,
                remote.chain.len()
            );
            continue;
        }
        if remote.length <= max_length {
            debug!(
                "RESOLVE - peer {peer} has length {}, no longer than {max_length}",
                remote.length
            );
            continue;
        }
        if !valid_chain(&remote.chain) {
            warn!("RESOLVE - skipping peer {peer}: chain failed validation");
            continue;
        }
        max_length = remote.length;
        best = Some(remote.chain);
    }

    let Some(candidate) = best else {
        debug!("RESOLVE - no qualifying peer chain, keeping local");
        return false;
    };

    // The local chain may have grown while we were fetching; adopt_chain
    // re-checks strictly-greater length under the lock.
    let replaced = {
        let mut ledger = ledger.lock().expect("mutex poisoned");
        ledger.adopt_chain(candidate)
    };
    if replaced {
        info!("RESOLVE - local chain replaced by peer chain of length {max_length}");
    }
    replaced
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{ChainFetcher, FetchError, RemoteChain, resolve_conflicts};
    use crate::consensus::peers::PeerAddress;
    use crate::ledger::pow::proof_of_work;
    use crate::ledger::{Block, Ledger};

    /// Serves canned responses keyed by peer; unknown peers are 404s.
    struct StubFetcher {
        responses: HashMap<PeerAddress, Result<RemoteChain, u16>>,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        fn chain(mut self, peer: &PeerAddress, remote: RemoteChain) -> Self {
            self.responses.insert(peer.clone(), Ok(remote));
            self
        }

        fn failure(mut self, peer: &PeerAddress, status: u16) -> Self {
            self.responses.insert(peer.clone(), Err(status));
            self
        }
    }

    impl ChainFetcher for StubFetcher {
        async fn fetch_chain(&self, peer: &PeerAddress) -> Result<RemoteChain, FetchError> {
            match self.responses.get(peer) {
                Some(Ok(remote)) => Ok(remote.clone()),
                Some(Err(status)) => Err(FetchError::Status(*status)),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn peer(addr: &str) -> PeerAddress {
        PeerAddress::parse(addr).unwrap()
    }

    /// Mine `extra` blocks on a fresh ledger and return its chain.
    fn mined_chain(extra: usize) -> Vec<Block> {
        let mut ledger = Ledger::new();
        for i in 0..extra {
            ledger.new_transaction("A", "B", i as u64 + 1);
            let proof = proof_of_work(ledger.last_block().proof);
            ledger.new_block(proof, None);
        }
        ledger.chain().to_vec()
    }

    fn remote(chain: Vec<Block>) -> RemoteChain {
        RemoteChain {
            length: chain.len(),
            chain,
        }
    }

    fn ledger_with_peers(peers: &[PeerAddress]) -> Mutex<Ledger> {
        let mut ledger = Ledger::new();
        for p in peers {
            ledger.add_peer(p.clone());
        }
        Mutex::new(ledger)
    }

    #[actix_web::test]
    async fn adopts_a_strictly_longer_valid_chain() {
        let p = peer("10.0.0.1:5000");
        let foreign = mined_chain(2);
        let fetcher = StubFetcher::new().chain(&p, remote(foreign.clone()));
        let ledger = ledger_with_peers(std::slice::from_ref(&p));

        assert!(resolve_conflicts(&ledger, &fetcher).await);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.chain(), &foreign[..]);
    }

    #[actix_web::test]
    async fn never_adopts_an_equal_length_chain() {
        let p = peer("10.0.0.1:5000");
        // A different genesis-only chain: same length as ours.
        let fetcher = StubFetcher::new().chain(&p, remote(mined_chain(0)));
        let ledger = ledger_with_peers(std::slice::from_ref(&p));
        let before = ledger.lock().unwrap().chain().to_vec();

        assert!(!resolve_conflicts(&ledger, &fetcher).await);
        assert_eq!(ledger.lock().unwrap().chain(), &before[..]);
    }

    #[actix_web::test]
    async fn prefers_a_shorter_valid_chain_over_a_longer_invalid_one() {
        let invalid_peer = peer("10.0.0.1:5000");
        let valid_peer = peer("10.0.0.2:5000");

        let mut invalid = mined_chain(4); // length 5
        invalid[2].proof += 1;
        let valid = mined_chain(2); // length 3

        let fetcher = StubFetcher::new()
            .chain(&invalid_peer, remote(invalid))
            .chain(&valid_peer, remote(valid.clone()));
        let ledger = ledger_with_peers(&[invalid_peer, valid_peer]);
        {
            // Grow the local chain to length 2 so only longer chains qualify.
            let mut ledger = ledger.lock().unwrap();
            let proof = proof_of_work(ledger.last_block().proof);
            ledger.new_block(proof, None);
        }

        assert!(resolve_conflicts(&ledger, &fetcher).await);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.chain(), &valid[..]);
    }

    #[actix_web::test]
    async fn adopts_the_longest_of_several_valid_chains() {
        let shorter_peer = peer("10.0.0.1:5000");
        let longer_peer = peer("10.0.0.2:5000");

        let shorter = mined_chain(2); // length 3
        let longer = mined_chain(4); // length 5

        let fetcher = StubFetcher::new()
            .chain(&shorter_peer, remote(shorter))
            .chain(&longer_peer, remote(longer.clone()));
        let ledger = ledger_with_peers(&[shorter_peer, longer_peer]);

        assert!(resolve_conflicts(&ledger, &fetcher).await);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.chain(), &longer[..]);
    }

    #[actix_web::test]
    async fn an_unreachable_peer_does_not_abort_the_scan() {
        let dead_peer = peer("10.0.0.1:5000");
        let live_peer = peer("10.0.0.2:5000");
        let foreign = mined_chain(1);

        let fetcher = StubFetcher::new()
            .failure(&dead_peer, 503)
            .chain(&live_peer, remote(foreign));
        let ledger = ledger_with_peers(&[dead_peer, live_peer]);

        assert!(resolve_conflicts(&ledger, &fetcher).await);
        assert_eq!(ledger.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn a_length_report_that_disagrees_with_the_chain_is_skipped() {
        let p = peer("10.0.0.1:5000");
        let mut lying = remote(mined_chain(1));
        lying.length = 50;
        let fetcher = StubFetcher::new().chain(&p, lying);
        let ledger = ledger_with_peers(std::slice::from_ref(&p));

        assert!(!resolve_conflicts(&ledger, &fetcher).await);
        assert_eq!(ledger.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn no_peers_means_nothing_changes() {
        let fetcher = StubFetcher::new();
        let ledger = ledger_with_peers(&[]);
        assert!(!resolve_conflicts(&ledger, &fetcher).await);
        assert_eq!(ledger.lock().unwrap().len(), 1);
    }
}
