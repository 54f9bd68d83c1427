//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`AccountRegistry`], [`TransferEngine`]) are called by
//! inbound adapters. Driven ports ([`AccountRepository`],
//! [`TransferRepository`], [`TransferLedger`]) are implemented by storage
//! adapters and report failures through typed error enums.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registry;
mod account_repository;
mod transfer_engine;
mod transfer_repository;

#[cfg(test)]
pub use account_registry::MockAccountRegistry;
pub use account_registry::{AccountRegistry, RegistrationRequest};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use transfer_engine::MockTransferEngine;
pub use transfer_engine::{TransferEngine, TransferRequest};
#[cfg(test)]
pub use transfer_repository::{MockTransferLedger, MockTransferRepository};
pub use transfer_repository::{
    LedgerAccount, TransferAbort, TransferLedger, TransferPersistenceError, TransferRepository,
};
