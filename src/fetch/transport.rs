// src/fetch/transport.rs
// =============================================================================
// The network side of the fetch engine.
//
// The engine never talks to reqwest directly. It goes through the
// `Transport` trait, which performs exactly ONE attempt and reports how
// that attempt failed. Deciding whether to retry is the engine's job.
//
// Failure classes:
// - Retryable: connection refused/reset, timeouts, server disconnects,
//   protocol errors, socket errors. Worth trying again.
// - Rejected: the client refused to build the request (e.g. unsupported
//   scheme). Nothing went over the network and retrying cannot help.
// - Decode: a response arrived but its body could not be decoded. We keep
//   the status code and stop.
//
// In practice Decode is rare: `text()` replaces invalid UTF-8 instead of
// failing, and no reqwest compression feature is enabled, so `is_decode()`
// has little to fire on. The engine tests drive that branch with a
// scripted transport.
// =============================================================================

use reqwest::{redirect, Client};
use thiserror::Error;
use url::Url;

use crate::config::{FetchConfig, MAX_REDIRECTS};

/// A response that was received and read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("{0}")]
    Retryable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("failed to decode response body: {message}")]
    Decode { status: u16, message: String },
}

/// Performs a single GET attempt.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &Url) -> Result<Page, TransportError>;
}

// Could not even build the HTTP client (TLS backend failure and friends)
#[derive(Debug, Error)]
#[error("failed to create HTTP client: {0}")]
pub struct EngineError(#[from] reqwest::Error);

/// reqwest-backed transport. Owns one connection pool; dropping it tears
/// the pool down.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &FetchConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Page, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status().as_u16();

        // Any HTTP status is a successful fetch here. Interpreting 404/500
        // is left to whoever reads the results.
        let body = response
            .text()
            .await
            .map_err(|error| classify_body_error(status, error))?;

        Ok(Page { status, body })
    }
}

fn classify_send_error(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::Rejected(error.to_string())
    } else {
        // timeouts, connect errors, redirects, protocol errors, disconnects
        TransportError::Retryable(error_chain(&error))
    }
}

fn classify_body_error(status: u16, error: reqwest::Error) -> TransportError {
    if error.is_decode() {
        TransportError::Decode {
            status,
            message: error_chain(&error),
        }
    } else {
        // the connection dropped while the body was streaming
        TransportError::Retryable(error_chain(&error))
    }
}

// reqwest's Display only shows the outermost layer ("error sending
// request"), the useful part lives in the source chain.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
