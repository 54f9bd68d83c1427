//! Driving port for moving funds between accounts.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{AccountId, LedgerError, Transfer};

/// Raw transfer values as received by an inbound adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Decimal,
}

/// Domain use-case port for the transfer engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferEngine: Send + Sync {
    /// Move `amount` from `from` to `to` atomically.
    async fn transfer(&self, request: TransferRequest) -> Result<Transfer, LedgerError>;
}
