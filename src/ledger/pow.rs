use std::time::Instant;

use sha2::{Digest, Sha256};

use super::DIFFICULTY_PREFIX;

/// Check whether `proof` is a valid successor to `last_proof`.
///
/// The two proofs are concatenated as text, hashed twice with SHA-256
/// (digest of digest), and the hex form of the second digest must start
/// with [`DIFFICULTY_PREFIX`]. The same predicate drives both mining and
/// chain validation.
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    let round1 = Sha256::digest(guess.as_bytes());
    let round2 = Sha256::digest(round1);
    hex::encode(round2).starts_with(DIFFICULTY_PREFIX)
}

/// Find the smallest non-negative proof valid against `last_proof`.
///
/// Blocking, CPU-bound brute force with no upper bound; at the current
/// difficulty it takes ~2^16 hash pairs on average. Deterministic for a
/// given `last_proof`.
pub fn proof_of_work(last_proof: u64) -> u64 {
    proof_of_work_until(last_proof, None).expect("unbounded search runs until a proof is found")
}

/// Deadline-bounded proof search for callers that need to cap worst-case
/// latency. With no deadline the search never gives up. Returns `None` if
/// the deadline passes first; the search is restartable from scratch, so
/// a caller may simply try again.
pub fn proof_of_work_until(last_proof: u64, deadline: Option<Instant>) -> Option<u64> {
    let mut proof = 0;
    loop {
        if valid_proof(last_proof, proof) {
            return Some(proof);
        }
        // Only consult the clock every so often; a syscall per candidate
        // would dominate the hashing itself.
        if let Some(deadline) = deadline {
            if proof % 1024 == 0 && Instant::now() >= deadline {
                return None;
            }
        }
        proof += 1;
    }
}
