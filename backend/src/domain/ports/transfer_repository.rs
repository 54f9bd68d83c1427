//! Ports through which a transfer runs inside one storage transaction.
//!
//! [`TransferRepository`] is what the transfer engine calls. Adapters open a
//! transaction, hand a [`TransferLedger`] for it to
//! [`apply_transfer_stages`](crate::domain::apply_transfer_stages), and commit
//! only when the stages succeed. Any [`TransferAbort`] rolls the transaction
//! back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, AccountRole, Money, Transfer, TransferDraft};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised while applying a transfer.
    pub enum TransferPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "transfer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "transfer repository query failed: {message}",
        /// The store did not answer within the configured bound.
        Timeout { message: String } => "transfer repository timed out: {message}",
    }
}

impl TransferPersistenceError {
    /// Adapter-supplied message without the variant prefix.
    pub fn cause(&self) -> &str {
        match self {
            Self::Connection { message } | Self::Query { message } | Self::Timeout { message } => {
                message
            }
        }
    }
}

/// Why a transfer transaction was rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferAbort {
    /// A participant does not exist.
    #[error("{role} account {id} not found")]
    AccountMissing { role: AccountRole, id: AccountId },
    /// The source balance cannot cover the amount.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// Reading or locking failed before any mutation was attempted.
    #[error("transfer lookup failed: {0}")]
    Storage(TransferPersistenceError),
    /// A mutation or the commit itself failed.
    #[error("transfer commit failed: {0}")]
    Commit(TransferPersistenceError),
    /// The transfer insert returned no row.
    #[error("transfer row missing after insert")]
    MissingRecord,
}

/// Balance snapshot of a locked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerAccount {
    pub id: AccountId,
    pub balance: Money,
}

/// Unit-of-work surface exposed by a store inside one open transaction.
///
/// Every method operates on the same transaction; nothing is visible to other
/// callers until the adapter commits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferLedger: Send {
    /// Lock the account row for the rest of the transaction and read it.
    async fn lock_account(
        &mut self,
        id: AccountId,
    ) -> Result<Option<LedgerAccount>, TransferPersistenceError>;

    /// Subtract `amount` when the balance covers it.
    ///
    /// Returns `false` when no row matched, i.e. the balance was too low.
    async fn debit(
        &mut self,
        id: AccountId,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, TransferPersistenceError>;

    /// Add `amount`. Returns `false` when the account row is gone.
    async fn credit(
        &mut self,
        id: AccountId,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, TransferPersistenceError>;

    /// Insert the transfer row and return it.
    async fn record_transfer(
        &mut self,
        draft: &TransferDraft,
    ) -> Result<Option<Transfer>, TransferPersistenceError>;
}

/// Driven port applying a transfer atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferRepository: Send + Sync {
    /// Run the transfer stages in one transaction and commit on success.
    async fn apply(&self, draft: &TransferDraft) -> Result<Transfer, TransferAbort>;
}
