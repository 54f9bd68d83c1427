//! Ledger service entry point: loads settings, wires the store and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ledger::inbound::http::health::HealthState;
use server::{LedgerSettings, ServerConfig, build_http_state, create_server};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = LedgerSettings::load()
        .map_err(|err| color_eyre::eyre::eyre!("failed to load ledger settings: {err}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("invalid bind address")?;

    let health_state = web::Data::new(HealthState::new());
    let http_state = build_http_state(&settings).await?;
    let server = create_server(health_state.clone(), http_state, ServerConfig::new(bind_addr))?;
    info!(%bind_addr, "ledger listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}
