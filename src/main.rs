use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use std::io;

use pow_ledger::api::{self, AppState};
use pow_ledger::blockchain::{CancelToken, Ledger, SharedLedger};
use pow_ledger::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    info!(
        "mining genesis block (difficulty={}, data={:?})",
        config.difficulty, config.genesis_data
    );
    let ledger = Ledger::bootstrap(
        config.difficulty,
        config.genesis_data.clone().into(),
        &CancelToken::with_timeout(config.mining_timeout),
    )
    .map_err(|e| io::Error::other(format!("genesis mining failed: {e}")))?;

    let host = config.host.clone();
    let port = config.port;
    println!("⛓️ Starting ledger API at http://{host}:{port}");

    let state = web::Data::new(AppState::new(SharedLedger::new(ledger), &config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
