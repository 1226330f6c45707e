use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{
    AppState, NodesResponse, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse,
};
use crate::consensus::resolve_conflicts;

/// Register a list of peer node addresses.
///
/// Registration is per-address and idempotent; an unparseable address
/// aborts with a 400 (resubmitting the corrected list is safe, the set
/// deduplicates).
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        warn!("POST /nodes/register/ - rejected: empty node list");
        return HttpResponse::BadRequest().body("please supply a non-empty list of nodes");
    }

    let total_nodes = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        for address in &body.nodes {
            match ledger.register_node(address) {
                Ok(peer) => debug!("registered peer {peer}"),
                Err(err) => {
                    warn!("POST /nodes/register/ - rejected: {err}");
                    return HttpResponse::BadRequest().body(err.to_string());
                }
            }
        }
        ledger.peers().iter().map(|p| p.to_string()).collect()
    };

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes,
    })
}

/// List the registered peers.
#[get("/nodes/")]
pub async fn get_nodes(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        nodes: ledger.peers().iter().map(|p| p.to_string()).collect(),
    })
}

/// Run longest-valid-chain resolution against all registered peers.
#[get("/nodes/resolve/")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let replaced = resolve_conflicts(&state.ledger, &state.fetcher).await;

    let ledger = state.ledger.lock().expect("mutex poisoned");
    info!(
        "GET /nodes/resolve/ - {} (length {})",
        if replaced { "chain replaced" } else { "chain kept" },
        ledger.len()
    );
    HttpResponse::Ok().json(ResolveResponse {
        message: if replaced {
            "Local chain was replaced"
        } else {
            "Local chain is authoritative"
        },
        replaced,
        length: ledger.len(),
        chain: ledger.chain().to_vec(),
    })
}
