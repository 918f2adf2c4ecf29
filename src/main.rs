use crate::config::{Config, ConfigReport};
use crate::state::AppState;
use astra::Server;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod drafting;
mod errors;
mod flow;
mod mailings;
mod responses;
mod router;
mod routes;
mod scraper;
mod spreadsheets;
mod state;
mod store;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Environment and logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Adapters and the local database
    let state = match AppState::from_config(&cfg, ConfigReport::from_env()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("❌ Startup failed: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Serve
    tracing::info!(
        addr = %cfg.addr,
        store = %state.settings.config_report.lead_store,
        source = state.source.name(),
        "Starting server at http://{}",
        cfg.addr
    );

    let server = Server::bind(&cfg.addr).max_workers(cfg.max_workers);
    let result = server.serve(move |req, _info| router::serve(req, &state));

    if let Err(e) = result {
        tracing::error!("Server ended with error: {e}");
    }

    tracing::info!("Server shut down cleanly.");
}
