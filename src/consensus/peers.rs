use std::collections::HashSet;
use std::collections::hash_set;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum PeerAddressError {
    #[error("cannot parse peer address {0:?}")]
    Unparseable(String),
}

/// The normalized host:port identity of a peer node.
///
/// Two URL spellings of the same network location (`http://10.0.0.5:5000`
/// and `10.0.0.5:5000`, say) compare equal, so the peer set deduplicates
/// on the location itself rather than the string the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PeerAddress(String);

impl PeerAddress {
    /// Parse a URL or bare `host[:port]` down to its network location.
    pub fn parse(input: &str) -> Result<Self, PeerAddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PeerAddressError::Unparseable(input.to_string()));
        }

        // Scheme-less forms like "10.0.0.5:5000" either fail to parse or
        // parse with their host swallowed by the scheme; retry with an
        // explicit scheme before giving up.
        let url = Url::parse(trimmed)
            .ok()
            .filter(|url| url.host_str().is_some())
            .or_else(|| Url::parse(&format!("http://{trimmed}")).ok())
            .filter(|url| url.host_str().is_some())
            .ok_or_else(|| PeerAddressError::Unparseable(input.to_string()))?;

        let host = url.host_str().expect("host presence checked above");
        let netloc = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        Ok(Self(netloc))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of known peer nodes. Membership only: no ordering, no liveness
/// tracking, and peers are never removed.
#[derive(Debug, Default)]
pub struct PeerSet {
    peers: HashSet<PeerAddress>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the peer was already known.
    pub fn insert(&mut self, peer: PeerAddress) -> bool {
        self.peers.insert(peer)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, PeerAddress> {
        self.peers.iter()
    }
}

impl<'a> IntoIterator for &'a PeerSet {
    type Item = &'a PeerAddress;
    type IntoIter = hash_set::Iter<'a, PeerAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.peers.iter()
    }
}
