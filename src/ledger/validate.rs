use super::Block;
use super::pow::valid_proof;

/// Check a candidate chain for internal consistency: every block after
/// the first must reference its predecessor's digest and carry a proof
/// valid against the predecessor's proof.
///
/// Pure and side-effect free, so it is safe to run on untrusted chains
/// received from peers. A single-block chain is trivially valid.
pub fn valid_chain(chain: &[Block]) -> bool {
    for pair in chain.windows(2) {
        let (prev, block) = (&pair[0], &pair[1]);

        if block.previous_hash != prev.hash() {
            return false;
        }
        if !valid_proof(prev.proof, block.proof) {
            return false;
        }
    }
    true
}
