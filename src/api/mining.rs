use actix_web::{HttpResponse, Responder, get, web};
use log::info;

use super::models::{AppState, MineResponse};
use crate::ledger::pow::proof_of_work;
use crate::ledger::{MINING_REWARD, MINING_SENDER};

/// Mine one block: run the proof-of-work search against the tip, credit
/// the reward to this node and seal the pending pool.
///
/// The ledger lock is held across the whole cycle so no other mutation
/// can slip between reading the tip and sealing against it. The search
/// blocks the worker for ~2^16 hash pairs at the current difficulty.
#[get("/mine/")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    let block = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let last_proof = ledger.last_block().proof;
        let proof = proof_of_work(last_proof);

        ledger.new_transaction(MINING_SENDER, state.node_id.as_str(), MINING_REWARD);
        ledger.new_block(proof, None).clone()
    };

    info!(
        "MINER - sealed block #{} ({} txs, proof={})",
        block.index,
        block.transactions.len(),
        block.proof
    );

    HttpResponse::Ok().json(MineResponse {
        message: "New block forged",
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    })
}
