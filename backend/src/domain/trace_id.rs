//! Correlation identifier shared by request logs, responses and error bodies.
//!
//! The [`Trace`](crate::Trace) middleware runs every request inside
//! [`TraceId::scoped`]. Anything built while the request is handled, notably
//! [`Error`](crate::domain::Error) payloads, reads the identifier back through
//! [`TraceId::current`] instead of receiving it as an argument.
//!
//! The scope is a tokio task-local, so work moved onto another task must be
//! wrapped in [`TraceId::scoped`] again to keep the identifier.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Header name used both to accept and to echo the identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static ACTIVE: TraceId;
}

/// Identifier correlating one ledger request across its log lines and the
/// response it produces.
///
/// # Examples
/// ```
/// use ledger::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let trace_id: TraceId = "3f2c1a8e-5b0d-4e8a-9c61-0d7f4b2e9a10"
///     .parse()
///     .expect("valid trace id");
/// let seen = trace_id.scoped(async { TraceId::current() }).await;
/// assert_eq!(seen, Some(trace_id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Random identifier for a request that arrived without one.
    #[must_use]
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier taken from an incoming header, or a fresh one when the
    /// header is absent or not a UUID.
    #[must_use]
    pub(crate) fn from_header_or_fresh(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or_else(Self::fresh)
    }

    /// Identifier of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Hyphenated form of [`TraceId::current`], as stamped on error bodies.
    pub(crate) fn current_label() -> Option<String> {
        Self::current().map(|id| id.to_string())
    }

    /// Drive `fut` with this identifier in scope.
    pub async fn scoped<Fut>(self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const KNOWN: &str = "3f2c1a8e-5b0d-4e8a-9c61-0d7f4b2e9a10";

    #[tokio::test]
    async fn nested_scopes_shadow_the_outer_identifier() {
        let outer = TraceId::fresh();
        let inner = TraceId::fresh();

        let (before, during, after) = outer
            .scoped(async move {
                let before = TraceId::current();
                let during = inner.scoped(async { TraceId::current() }).await;
                (before, during, TraceId::current())
            })
            .await;

        assert_eq!(before, Some(outer));
        assert_eq!(during, Some(inner));
        assert_eq!(after, Some(outer));
    }

    #[tokio::test]
    async fn label_is_absent_outside_a_request() {
        assert_eq!(TraceId::current_label(), None);
    }

    #[rstest]
    #[case::well_formed(Some(KNOWN), Some(KNOWN))]
    #[case::padded(Some("  3f2c1a8e-5b0d-4e8a-9c61-0d7f4b2e9a10 "), Some(KNOWN))]
    #[case::garbage(Some("not-a-trace"), None)]
    #[case::missing(None, None)]
    fn incoming_header_is_reused_only_when_it_parses(
        #[case] header: Option<&str>,
        #[case] reused: Option<&str>,
    ) {
        let id = TraceId::from_header_or_fresh(header);
        match reused {
            Some(expected) => assert_eq!(id.to_string(), expected),
            None => assert_ne!(id.to_string(), header.unwrap_or_default()),
        }
    }
}
