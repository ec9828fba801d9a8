use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};
use std::time::Instant;

use super::models::{
    AppState, ChainResponse, DifficultyResponse, ErrorResponse, NewBlockRequest,
    SetDifficultyRequest, ValidateResponse,
};
use crate::blockchain::{CancelToken, Ledger, LedgerError, MiningError, Payload};

/// Get the full chain as an ordered list of blocks.
#[get("/blocks/")]
pub async fn get_blocks(state: web::Data<AppState>) -> impl Responder {
    let resp = state.ledger.read(|l| ChainResponse {
        length: l.len(),
        difficulty: l.difficulty(),
        total_difficulty: Ledger::total_difficulty(l.chain()),
        chain: l.chain().to_vec(),
    });
    HttpResponse::Ok().json(resp)
}

/// Mine a block carrying `data` on top of the current head and append it.
/// Mining runs on the blocking thread pool.
#[post("/blocks/")]
pub async fn post_block(
    state: web::Data<AppState>,
    body: web::Json<NewBlockRequest>,
) -> impl Responder {
    let t0 = Instant::now();
    let payload = Payload::new(body.into_inner().data);
    let ledger = state.ledger.clone();
    let cancel = CancelToken::with_timeout(state.mining_timeout);

    let mined = web::block(move || ledger.mine_and_append(payload, &cancel)).await;

    match mined {
        Ok(Ok(block)) => {
            info!(
                "POST /blocks/ - sealed block #{} (hash={}, proof={}) in {} ms",
                block.index,
                block.hash,
                block.proof,
                t0.elapsed().as_millis()
            );
            HttpResponse::Ok().json(block)
        }
        Ok(Err(e)) => {
            warn!("POST /blocks/ - failed: {e}");
            let body = ErrorResponse {
                error: e.to_string(),
            };
            match e {
                LedgerError::Mining(MiningError::TimedOut | MiningError::Cancelled) => {
                    HttpResponse::ServiceUnavailable().json(body)
                }
                _ => HttpResponse::BadRequest().json(body),
            }
        }
        Err(e) => {
            warn!("POST /blocks/ - mining task failed: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "mining task failed".to_string(),
            })
        }
    }
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let resp = state.ledger.read(|l| {
        let result = l.validate_chain(l.chain());
        ValidateResponse {
            valid: result.is_ok(),
            length: l.len(),
            error: result.err().map(|e| e.to_string()),
        }
    });
    HttpResponse::Ok().json(resp)
}

/// Get current PoW difficulty.
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: state.ledger.snapshot().difficulty,
    })
}

/// Update PoW difficulty (affects future blocks only).
#[post("/difficulty/")]
pub async fn set_difficulty(
    state: web::Data<AppState>,
    body: web::Json<SetDifficultyRequest>,
) -> impl Responder {
    if body.difficulty > state.max_api_difficulty {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("difficulty too high (max {})", state.max_api_difficulty),
        });
    }
    state.ledger.set_difficulty(body.difficulty);
    info!("difficulty set to {}", body.difficulty);
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: body.difficulty,
    })
}
