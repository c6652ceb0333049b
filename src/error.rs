//! Error taxonomy surfaced by the crime statistics client.

use thiserror::Error;

/// Classified failure of a crime estimates fetch, finalized after retries
/// exhaust. Messages are user-facing; callers degrade the UI rather than
/// crash.
#[derive(Debug, Error)]
pub enum CrimeApiError {
    /// Upstream answered 502/503/504 through every attempt and no mock
    /// fallback was available.
    #[error("API service temporarily unavailable (HTTP {status}), please try again in a few minutes")]
    ServiceUnavailable { status: u16 },
    /// Unknown agency code (HTTP 404).
    #[error("no data found for agency code: {agency}")]
    NotFound { agency: String },
    /// Rejected key (HTTP 401/403).
    #[error("API authentication failed, please check your API key")]
    Unauthorized,
    /// The request exceeded its deadline.
    #[error("request timeout: the API took too long to respond")]
    Timeout,
    /// No response was received at all.
    #[error("network error: {0}")]
    Network(String),
    /// Any other non-success upstream condition.
    #[error("API error (HTTP {status}): {reason}")]
    Upstream { status: u16, reason: String },
}
