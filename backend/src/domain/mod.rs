//! Domain primitives, services and ports of the ledger.
//!
//! Purpose: Define strongly typed ledger entities used by the HTTP and
//! persistence layers and the services enforcing the ledger invariants.
//! Types are immutable once constructed; serialisation contracts (serde) are
//! documented on each type.
//!
//! Public surface:
//! - Account, Transfer, Money and their identifiers.
//! - LedgerError: failure taxonomy of the registry and transfer engine.
//! - Error / ErrorCode: transport-agnostic error envelope.
//! - AccountRegistryService / TransferService: driving-port implementations.

pub mod account;
mod account_service;
pub mod error;
pub mod ledger_error;
pub mod money;
pub mod ports;
pub mod trace_id;
pub mod transfer;
mod transfer_service;
mod transfer_stages;

pub use self::account::{
    ACCOUNT_NAME_MAX, Account, AccountDraft, AccountId, AccountName, AccountValidationError,
    IdentityKey, NewAccount, Registration,
};
pub use self::account_service::AccountRegistryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger_error::LedgerError;
pub use self::money::{MONEY_MAX, MONEY_SCALE, Money, MoneyValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transfer::{AccountRole, Transfer, TransferDraft, TransferId};
pub use self::transfer_service::TransferService;
pub use self::transfer_stages::apply_transfer_stages;
