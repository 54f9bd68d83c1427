//! Outbound adapters implementing the driven ports.
//!
//! [`persistence`] talks to PostgreSQL through Diesel; [`memory`] keeps the
//! ledger in process for development and tests.

pub mod memory;
pub mod persistence;
