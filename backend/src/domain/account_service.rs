//! Account registry service.
//!
//! Validates registration input, stamps it with the injected clock and relies
//! on the store's unique constraint to detect duplicate identity keys.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    AccountPersistenceError, AccountRegistry, AccountRepository, RegistrationRequest,
};
use crate::domain::{Account, LedgerError, NewAccount, Registration};

fn map_repository_error(error: AccountPersistenceError) -> LedgerError {
    match error {
        AccountPersistenceError::DuplicateIdentity { identity_key } => {
            LedgerError::DuplicateIdentity { identity_key }
        }
        other => {
            error!(error = %other, "account repository failed");
            LedgerError::storage_failure(other.to_string())
        }
    }
}

/// Account registry backed by an [`AccountRepository`].
#[derive(Clone)]
pub struct AccountRegistryService<R> {
    accounts: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AccountRegistryService<R> {
    /// Create a registry over `accounts`, reading timestamps from `clock`.
    pub fn new(accounts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { accounts, clock }
    }
}

#[async_trait]
impl<R> AccountRegistry for AccountRegistryService<R>
where
    R: AccountRepository,
{
    async fn register(&self, request: RegistrationRequest) -> Result<Account, LedgerError> {
        let Registration {
            name,
            identity_key,
            initial_balance,
        } = Registration::try_from_parts(request.name, request.email, request.balance)?;

        let new_account = NewAccount {
            name,
            identity_key,
            balance: initial_balance,
            // Stored timestamps have microsecond precision.
            created_at: self.clock.utc().trunc_subsecs(6),
        };

        let account = self
            .accounts
            .insert(&new_account)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                error!(identity_key = %new_account.identity_key, "insert returned no row");
                LedgerError::storage_failure("account row missing after insert")
            })?;

        info!(
            account_id = %account.id(),
            balance = %account.balance(),
            "account registered"
        );
        Ok(account)
    }

    async fn list(&self) -> Result<Vec<Account>, LedgerError> {
        self.accounts
            .list_recent_first()
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
