mod chain;
mod health;
pub mod models;
mod stats;
mod sync;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_blocks)
            .service(chain::post_block)
            .service(chain::validate_chain)
            .service(chain::get_difficulty)
            .service(chain::set_difficulty)
            .service(stats::get_stats)
            .service(sync::post_sync),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{Block, CancelToken, Ledger, SharedLedger};
    use crate::config::Config;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    fn state(difficulty: u32) -> web::Data<AppState> {
        let config = Config {
            difficulty,
            max_api_difficulty: 12,
            ..Config::default()
        };
        let ledger = Ledger::bootstrap(
            config.difficulty,
            config.genesis_data.clone().into(),
            &CancelToken::new(),
        )
        .unwrap();
        web::Data::new(AppState::new(SharedLedger::new(ledger), &config))
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let app = test::init_service(App::new().configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn post_block_then_read_chain() {
        let st = state(4);
        let app =
            test::init_service(App::new().app_data(st.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/blocks/")
            .set_json(json!({ "data": { "some": "acculi", "data": "yes" } }))
            .to_request();
        let block: Block = test::call_and_read_body_json(&app, req).await;
        assert_eq!(block.index, 1);
        assert!(block.has_valid_proof());

        let req = test::TestRequest::get().uri("/api/v1/blocks/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["length"], 2);
        assert_eq!(body["total_difficulty"], 8);
        assert_eq!(body["chain"][0]["payload"], "genesis block");
        assert_eq!(body["chain"][1]["hash"], block.hash);

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["error"], Value::Null);
    }

    #[actix_web::test]
    async fn difficulty_is_bounded_by_config() {
        let st = state(2);
        let app =
            test::init_service(App::new().app_data(st.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/difficulty/")
            .set_json(json!({ "difficulty": 13 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/v1/difficulty/")
            .set_json(json!({ "difficulty": 6 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/v1/difficulty/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["difficulty"], 6);
    }

    #[actix_web::test]
    async fn stats_report_height_and_work() {
        let st = state(3);
        st.ledger
            .mine_and_append("a".into(), &CancelToken::new())
            .unwrap();
        let app =
            test::init_service(App::new().app_data(st.clone()).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/stats/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["height"], 2);
        assert_eq!(body["total_difficulty"], 6);
        assert!(body["last_interval_secs"].is_i64());
    }

    #[actix_web::test]
    async fn sync_answers_queries_and_rejects_bad_chains() {
        let st = state(2);
        let app =
            test::init_service(App::new().app_data(st.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/sync/")
            .set_json(json!({ "type": "query_latest" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "response_blockchain");
        assert_eq!(body["data"][0]["index"], 0);

        let req = test::TestRequest::post()
            .uri("/api/v1/sync/")
            .set_json(json!({ "type": "response_blockchain", "data": [] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "chain_rejected");
        assert_eq!(st.ledger.chain().len(), 1);
    }
}
