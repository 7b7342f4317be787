//! Retry configuration and a transport-level retrying executor.
//!
//! Retries wrap the executor, never the query pipeline: only failures that
//! produced no response at all are repeated. A response with any status is
//! handed back untouched.

use backon::{ExponentialBuilder, Retryable};
use log::warn;
use tokio::time::{Duration, sleep};

use super::executor::{HttpRequest, HttpResponse, RequestExecutor};
use crate::error::TransportError;

/// Configuration for retrying failed requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of retries after the initial attempt.
    pub retries: usize,
    /// Base delay for the exponential backoff.
    pub base_delay: Duration,
    /// Whether to jitter the backoff delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(200),
            jitter: true,
        }
    }
}

/// Build an exponential backoff retry builder from the given configuration.
///
/// # Examples
/// ```
/// use ghql::api::retry::{RetryConfig, build_retry_builder};
///
/// let config = RetryConfig {
///     retries: 1,
///     ..RetryConfig::default()
/// };
/// let _builder = build_retry_builder(config);
/// ```
#[must_use]
pub fn build_retry_builder(config: RetryConfig) -> ExponentialBuilder {
    let builder = ExponentialBuilder::default()
        .with_min_delay(config.base_delay)
        .with_max_times(config.retries);
    if config.jitter {
        builder.with_jitter()
    } else {
        builder
    }
}

/// Determines whether a transport failure is worth repeating.
///
/// Everything is retried except `reqwest` builder errors, which fail the same
/// way on every attempt.
#[must_use]
pub fn should_retry(err: &TransportError) -> bool {
    err.source
        .downcast_ref::<reqwest::Error>()
        .is_none_or(|e| !e.is_builder())
}

/// Executor decorator that retries [`TransportError`]s with exponential
/// backoff.
#[derive(Debug, Clone)]
pub struct RetryingExecutor<E> {
    inner: E,
    config: RetryConfig,
}

impl<E> RetryingExecutor<E> {
    pub fn new(inner: E, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: RequestExecutor + Sync> RequestExecutor for RetryingExecutor<E> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = build_retry_builder(self.config);
        (|| self.inner.execute(request.clone()))
            .retry(builder)
            .sleep(sleep)
            .when(should_retry)
            .notify(|err: &TransportError, dur| warn!("retrying request after {dur:?}: {err}"))
            .await
    }
}
