//! Failure taxonomy of the account registry and transfer engine.
//!
//! Every variant maps to one [`ErrorCode`] so adapters can report a distinct
//! status and message per failure kind.

use serde_json::json;

use super::account::{AccountId, AccountValidationError};
use super::error::{Error, ErrorCode};
use super::money::MoneyValidationError;
use super::transfer::AccountRole;

/// Ledger operation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Request values failed validation before touching storage.
    #[error("{0}")]
    InvalidInput(#[from] AccountValidationError),
    /// An account already uses this identity key.
    #[error("an account with email {identity_key} already exists")]
    DuplicateIdentity { identity_key: String },
    /// A referenced account does not exist.
    #[error("{role} account {id} not found")]
    AccountNotFound { role: AccountRole, id: AccountId },
    /// Source and destination are the same account.
    #[error("cannot transfer funds to the same account")]
    SelfTransfer,
    /// Transfer amount is not strictly positive or too precise.
    #[error("invalid transfer amount: {0}")]
    InvalidAmount(MoneyValidationError),
    /// Source balance cannot cover the transfer.
    #[error("insufficient funds for transfer")]
    InsufficientFunds,
    /// The commit stage failed and the transaction was rolled back.
    #[error("transfer failed: {cause}")]
    TransferFailed { cause: String },
    /// The store failed outside of a transfer commit.
    #[error("storage failure: {message}")]
    StorageFailure { message: String },
}

impl LedgerError {
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::StorageFailure {
            message: message.into(),
        }
    }

    pub fn transfer_failed(cause: impl Into<String>) -> Self {
        Self::TransferFailed {
            cause: cause.into(),
        }
    }

    /// Stable code reported to clients.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::DuplicateIdentity { .. } => ErrorCode::DuplicateIdentity,
            Self::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            Self::SelfTransfer => ErrorCode::SelfTransfer,
            Self::InvalidAmount(_) => ErrorCode::InvalidAmount,
            Self::InsufficientFunds => ErrorCode::InsufficientFunds,
            Self::TransferFailed { .. } => ErrorCode::TransferFailed,
            Self::StorageFailure { .. } => ErrorCode::StorageFailure,
        }
    }
}

impl From<LedgerError> for Error {
    fn from(value: LedgerError) -> Self {
        let error = Error::new(value.code(), value.to_string());
        match &value {
            LedgerError::InvalidInput(err) => error.with_details(json!({ "field": err.field() })),
            LedgerError::AccountNotFound { role, id } => {
                error.with_details(json!({ "role": role, "account_id": id }))
            }
            LedgerError::InvalidAmount(_) => error.with_details(json!({ "field": "amount" })),
            _ => error,
        }
    }
}
