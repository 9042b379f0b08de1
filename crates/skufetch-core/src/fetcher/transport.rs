//! Network seam for the fetcher: one GET per descriptor, status code or error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::error::Error as _;
use std::time::Duration;

use crate::descriptor::RequestDescriptor;

/// Failure of a single request. Recorded as `ERROR`, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Request(String),
}

/// Issues the GET described by a descriptor and returns the response status.
/// Any HTTP status is a response; only transport-level problems are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, descriptor: &RequestDescriptor) -> Result<u16, TransportError>;
}

/// `reqwest`-backed transport. The response body is not read.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(concat!("skufetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, descriptor: &RequestDescriptor) -> Result<u16, TransportError> {
        let mut request = self.client.get(descriptor.target_url());
        for (name, value) in descriptor.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Request(error_chain(&e))
            }
        })?;
        Ok(response.status().as_u16())
    }
}

/// `reqwest` errors keep the useful part (DNS, refused, TLS) in their sources.
fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
