//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Account, NewAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The store did not answer within the configured bound.
        Timeout { message: String } => "account repository timed out: {message}",
        /// The unique constraint on the identity key rejected the insert.
        DuplicateIdentity { identity_key: String } =>
            "identity key {identity_key} is already registered",
    }
}

/// Driven port for account rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return the persisted row.
    ///
    /// `Ok(None)` means the store accepted the insert but returned no row.
    async fn insert(&self, account: &NewAccount)
    -> Result<Option<Account>, AccountPersistenceError>;

    /// All accounts, newest first with ties broken by identifier descending.
    async fn list_recent_first(&self) -> Result<Vec<Account>, AccountPersistenceError>;
}
