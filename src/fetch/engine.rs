// src/fetch/engine.rs
// =============================================================================
// Fetches a batch of URLs concurrently, with retries.
//
// How it works:
// 1. One task per URL is created up front and all of them are awaited
//    together with join_all (fan-out / fan-in). join_all yields results in
//    the order the futures were created, so output order == input order no
//    matter which request finishes first.
// 2. A semaphore caps how many URLs are in flight. A task holds its permit
//    for its WHOLE retry sequence, not just one attempt, so a URL that keeps
//    failing occupies a slot until it succeeds or runs out of attempts.
// 3. Retries are immediate (zero backoff). The semaphore already bounds how
//    hard we can hit a failing host.
//
// Per-URL state machine:
//
//   Attempting --ok------------------------------> Success
//   Attempting --retryable, attempts left--------> Attempting
//   Attempting --retryable, no attempts left-----> Exhausted (status 0, error)
//   Attempting --rejected / decode---------------> Aborted   (error)
//   invalid URL ---------------------------------> Aborted   (never attempted)
//
// Failures never escape as Err: every URL gets exactly one FetchResult.
// =============================================================================

use futures::future::join_all;
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use url::Url;

use super::transport::{EngineError, HttpTransport, Transport, TransportError};
use crate::config::{ConfigError, FetchConfig, STATUS_CODE_DEFAULT};

/// Outcome of fetching one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    pub status_code: u16,
    pub body: String,
    pub error: String,
}

impl FetchResult {
    fn success(url: &str, status_code: u16, body: String) -> Self {
        Self {
            url: url.to_string(),
            status_code,
            body,
            error: String::new(),
        }
    }

    fn failure(url: &str, status_code: u16, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status_code,
            body: String::new(),
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }
}

pub struct FetchEngine {
    config: FetchConfig,
}

impl FetchEngine {
    /// Rejects configurations that could never make progress, such as a
    /// zero concurrency limit.
    pub fn new(config: FetchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Fetches `urls` over HTTP.
    ///
    /// The connection pool lives only for the duration of this call and is
    /// released on every exit path when the transport is dropped.
    pub async fn fetch(&self, urls: &[String]) -> Result<Vec<FetchResult>, EngineError> {
        let transport = HttpTransport::new(&self.config)?;
        Ok(self.fetch_with(&transport, urls).await)
    }

    /// Fetches `urls` through any transport. Results keep the input order.
    pub async fn fetch_with<T: Transport>(&self, transport: &T, urls: &[String]) -> Vec<FetchResult> {
        debug!(
            "Fetching {} URL(s), concurrency {}, {} attempt(s) each",
            urls.len(),
            self.config.concurrency_limit,
            self.config.retry_limit
        );

        // Both are local to this batch and never shared with another call
        let semaphore = Semaphore::new(self.config.concurrency_limit);
        let failed_attempts = AtomicUsize::new(0);

        let tasks = urls
            .iter()
            .map(|url| self.fetch_one(transport, &semaphore, &failed_attempts, url));
        let results = join_all(tasks).await;

        debug!(
            "Number of failed attempts: {}",
            failed_attempts.load(Ordering::Relaxed)
        );
        results
    }

    async fn fetch_one<T: Transport>(
        &self,
        transport: &T,
        semaphore: &Semaphore,
        failed_attempts: &AtomicUsize,
        url: &str,
    ) -> FetchResult {
        // Malformed input never reaches the network and never takes a slot
        let target = match Url::parse(url) {
            Ok(target) => target,
            Err(e) => {
                warn!("Skipping invalid URL \"{url}\": {e}");
                return FetchResult::failure(url, STATUS_CODE_DEFAULT, format!("invalid URL: {e}"));
            }
        };

        let _permit = match semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => return FetchResult::failure(url, STATUS_CODE_DEFAULT, e.to_string()),
        };

        debug!("Request to url: \"{url}\" started");

        let retry_limit = self.config.retry_limit;
        let mut attempts_left = retry_limit;

        loop {
            let attempt = retry_limit - attempts_left + 1;

            match transport.get(&target).await {
                Ok(page) => {
                    debug!(
                        "Request to url: \"{url}\" succeeded with status {} on attempt {attempt}",
                        page.status
                    );
                    return FetchResult::success(url, page.status, page.body);
                }
                Err(TransportError::Retryable(message)) => {
                    failed_attempts.fetch_add(1, Ordering::Relaxed);
                    attempts_left -= 1;
                    warn!("Failed attempt num: {attempt} for \"{url}\" Error: {message}");

                    if attempts_left == 0 {
                        return FetchResult::failure(url, STATUS_CODE_DEFAULT, message);
                    }
                }
                Err(error @ TransportError::Rejected(_)) => {
                    warn!("Giving up on \"{url}\": {error}");
                    return FetchResult::failure(url, STATUS_CODE_DEFAULT, error.to_string());
                }
                Err(error @ TransportError::Decode { status, .. }) => {
                    warn!("Giving up on \"{url}\": {error}");
                    return FetchResult::failure(url, status, error.to_string());
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why join_all and not buffer_unordered?
//    - buffer_unordered returns results as they complete, so the order is
//      lost. join_all keeps the input order and the semaphore provides the
//      concurrency cap instead.
//
// 2. Why no tokio::spawn?
//    - All tasks run cooperatively on the current task. Borrowing the
//      transport, semaphore and counter is then fine without Arc, and
//      nothing outlives the call.
//
// 3. What does `error @ Pattern` mean?
//    - It matches the pattern and binds the whole value to `error`, so we
//      can both inspect a field and still log the complete error.
// -----------------------------------------------------------------------------
