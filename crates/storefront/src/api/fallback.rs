//! Fail-open wrapper around remote calls.
//!
//! Every data-fetching operation in the storefront is wrapped here: the remote
//! call is attempted once and any failure (network, non-2xx status, malformed
//! payload) is replaced by fallback data. Callers never see an error.

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

/// How loudly a fallback substitution is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Log at `debug`.
    #[default]
    Quiet,
    /// Log at `warn`.
    Loud,
}

impl FallbackPolicy {
    /// Await `operation`, returning `fallback` if it fails.
    pub async fn call<T, E, F>(self, operation: F, fallback: T, context: &str) -> T
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.call_with(operation, || fallback, context).await
    }

    /// Await `operation`, building the fallback with `make_fallback` only if
    /// it fails.
    pub async fn call_with<T, E, F, M>(self, operation: F, make_fallback: M, context: &str) -> T
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
        M: FnOnce() -> T,
    {
        match operation.await {
            Ok(value) => value,
            Err(e) => {
                match self {
                    Self::Quiet => debug!(context, error = %e, "Remote call failed, using fallback data"),
                    Self::Loud => warn!(context, error = %e, "Remote call failed, using fallback data"),
                }
                make_fallback()
            }
        }
    }
}

/// Await `operation`, returning `fallback` if it fails.
///
/// Failures are logged quietly; see [`FallbackPolicy::Loud`] for warn-level
/// logging.
pub async fn call_with_fallback<T, E, F>(operation: F, fallback: T, context: &str) -> T
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    FallbackPolicy::Quiet.call(operation, fallback, context).await
}

/// Lazy variant of [`call_with_fallback`].
pub async fn call_with_fallback_with<T, E, F, M>(operation: F, make_fallback: M, context: &str) -> T
where
    F: Future<Output = Result<T, E>>,
    E: Display,
    M: FnOnce() -> T,
{
    FallbackPolicy::Quiet
        .call_with(operation, make_fallback, context)
        .await
}
