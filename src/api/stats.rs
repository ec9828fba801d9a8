use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};
use crate::blockchain::Ledger;

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let resp = state.ledger.read(|l| {
        let chain = l.chain();
        // timestamps are not ordered across blocks, so this can be negative
        let last_interval_secs = match chain {
            [.., older, newer] => Some(newer.timestamp - older.timestamp),
            _ => None,
        };
        StatsResponse {
            height: chain.len(),
            difficulty: l.difficulty(),
            total_difficulty: Ledger::total_difficulty(chain),
            last_interval_secs,
        }
    });
    HttpResponse::Ok().json(resp)
}
