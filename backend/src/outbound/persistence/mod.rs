//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the ledger's driven ports backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types; the transfer checks live in the domain and run over
//!   [`TransferLedger`](crate::domain::ports::TransferLedger).
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Bounded calls**: every repository operation is wrapped in the pool's
//!   storage timeout.
//!
//! # Example
//!
//! ```ignore
//! use ledger::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ledger")).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! ```

mod deadline;
mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_transfer_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_transfer_repository::DieselTransferRepository;
pub use migrations::{MIGRATIONS, MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
