//! Transport and clock seams for the retrying client.
//!
//! The retry loop never calls `reqwest` or `tokio::time` directly; it talks
//! to these traits so tests can script attempt outcomes and record the
//! backoff schedule without a network or a real clock.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use super::CrimeSeries;

/// Outcome of a single fetch attempt, before retry classification.
#[derive(Debug)]
pub enum AttemptError {
    /// Upstream answered with a non-success status.
    Status { code: u16, reason: String },
    /// The attempt exceeded its deadline.
    Timeout,
    /// No response was received at all.
    Network(String),
    /// A response arrived but its body was not the expected JSON.
    Decode { status: u16, reason: String },
}

/// One attempt against the estimates endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CrimeSeries, AttemptError>;
}

/// Cooperative wait between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Reqwest-backed transport hitting the live statistics API.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("crimescope/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            client,
            api_key,
            timeout,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<CrimeSeries, AttemptError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AttemptError::Timeout
                } else {
                    AttemptError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response.json::<CrimeSeries>().await.map_err(|err| {
            if err.is_timeout() {
                AttemptError::Timeout
            } else {
                AttemptError::Decode {
                    status: status.as_u16(),
                    reason: err.to_string(),
                }
            }
        })
    }
}
