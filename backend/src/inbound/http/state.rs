//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see the
//! driving ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountRegistry, TransferEngine};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountRegistry>,
    pub transfers: Arc<dyn TransferEngine>,
}

impl HttpState {
    /// Bundle the registry and transfer engine for the handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ledger::domain::{AccountRegistryService, TransferService};
    /// use ledger::inbound::http::state::HttpState;
    /// use ledger::outbound::memory::InMemoryLedgerStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryLedgerStore::new());
    /// let state = HttpState::new(
    ///     Arc::new(AccountRegistryService::new(store.clone(), Arc::new(DefaultClock))),
    ///     Arc::new(TransferService::new(store, Arc::new(DefaultClock))),
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(accounts: Arc<dyn AccountRegistry>, transfers: Arc<dyn TransferEngine>) -> Self {
        Self {
            accounts,
            transfers,
        }
    }
}
