//! Ledger service library: account registration and atomic transfers.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the types, ports and
//! services; [`outbound`] implements the driven ports for PostgreSQL and for
//! process memory; [`inbound`] exposes the HTTP surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
