pub mod peers;
pub mod resolver;

pub use peers::{PeerAddress, PeerSet};
pub use resolver::{ChainFetcher, HttpChainFetcher, RemoteChain, resolve_conflicts};
