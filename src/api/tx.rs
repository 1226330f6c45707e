use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::ledger::pow::proof_of_work;

/// Submit a transaction, then immediately mine the block that carries it.
///
/// A payload missing any of sender/recipient/amount never reaches this
/// handler; typed JSON extraction rejects it with a 400 before the
/// ledger is touched.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let NewTxRequest {
        sender,
        recipient,
        amount,
    } = body.into_inner();
    debug!("POST /transactions/ - {sender} -> {recipient}, amount {amount}");

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let index = ledger.new_transaction(sender, recipient, amount);
        let proof = proof_of_work(ledger.last_block().proof);
        ledger.new_block(proof, None);
        index
    };

    info!("POST /transactions/ - sealed into block {index}");
    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to block {index}"),
        index,
    })
}

/// List the transactions waiting to be sealed into the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending().to_vec(),
    })
}
