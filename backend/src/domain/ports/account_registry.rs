//! Driving port for registering and listing accounts.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Account, LedgerError};

/// Raw registration values as received by an inbound adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub balance: Decimal,
}

/// Domain use-case port for the account registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// Validate and create a new account.
    async fn register(&self, request: RegistrationRequest) -> Result<Account, LedgerError>;

    /// Every account, newest first.
    async fn list(&self) -> Result<Vec<Account>, LedgerError>;
}
