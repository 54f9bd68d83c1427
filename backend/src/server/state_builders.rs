//! Wiring of the ledger services onto the configured store.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use ledger::domain::{AccountRegistryService, TransferService};
use ledger::inbound::http::state::HttpState;
use ledger::outbound::memory::InMemoryLedgerStore;
use ledger::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselTransferRepository, migrate,
};

use super::config::LedgerSettings;

/// Build handler state over PostgreSQL when a database URL is configured,
/// otherwise over a fresh in-memory store.
pub async fn build_http_state(settings: &LedgerSettings) -> color_eyre::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; ledger state lives in memory only");
        let store = Arc::new(InMemoryLedgerStore::new());
        return Ok(HttpState::new(
            Arc::new(AccountRegistryService::new(store.clone(), clock.clone())),
            Arc::new(TransferService::new(store, clock)),
        ));
    };

    if settings.run_migrations() {
        let applied = migrate(database_url.to_owned()).await?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(settings.pool_config(database_url)).await?;
    info!("database pool ready");
    let accounts = Arc::new(DieselAccountRepository::new(pool.clone()));
    let transfers = Arc::new(DieselTransferRepository::new(pool));
    Ok(HttpState::new(
        Arc::new(AccountRegistryService::new(accounts, clock.clone())),
        Arc::new(TransferService::new(transfers, clock)),
    ))
}
