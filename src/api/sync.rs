use actix_web::{HttpResponse, Responder, post, web};

use super::models::AppState;
use crate::p2p::{self, Message};

/// Deliver one peer-sync message and return the ledger's reply.
/// Handled on the blocking thread pool.
#[post("/sync/")]
pub async fn post_sync(state: web::Data<AppState>, body: web::Json<Message>) -> impl Responder {
    let ledger = state.ledger.clone();
    match web::block(move || p2p::handle(&ledger, body.into_inner())).await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}
