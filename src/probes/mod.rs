//! Connectivity probes and the health aggregator.
//!
//! Each probe checks one external dependency and maps every failure path
//! into a [`ConnectionStatus`]; nothing here returns `Err` or panics on a
//! dead dependency.

pub mod database;
pub mod external;
pub mod server;

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::config::Settings;

/// Outcome class of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Error,
    Warning,
    Pending,
}

impl ProbeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Pending => "pending",
        }
    }
}

/// Overall verdict across all probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overall {
    Healthy,
    Degraded,
    Down,
}

impl Overall {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Down => "down",
        }
    }
}

/// One probe's result, created fresh per invocation and never mutated after
/// return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub name: String,
    pub status: ProbeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate over one full probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub overall: Overall,
    pub services: Vec<ConnectionStatus>,
    pub timestamp: DateTime<Utc>,
}

/// Run every probe concurrently and reduce to a single verdict.
///
/// All probes start together and the aggregate waits for the slowest one.
/// Service order is the fixed invocation order, not completion order, so the
/// output is stable across runs.
pub async fn run_all(settings: &Settings) -> TestResult {
    let (web, internet, api, db) = tokio::join!(
        server::probe(settings),
        external::probe_internet(),
        external::probe_statistics_api(settings),
        database::probe(settings),
    );

    let services = vec![web, internet, api, db];
    let overall = summarize(&services);
    info!(overall = overall.as_str(), "connection test finished");

    TestResult {
        overall,
        services,
        timestamp: Utc::now(),
    }
}

/// Reduce per-service statuses: any error downs the system, else any warning
/// degrades it.
pub fn summarize(services: &[ConnectionStatus]) -> Overall {
    if services.iter().any(|s| s.status == ProbeStatus::Error) {
        Overall::Down
    } else if services.iter().any(|s| s.status == ProbeStatus::Warning) {
        Overall::Degraded
    } else {
        Overall::Healthy
    }
}

/// Stamp a probe outcome with its elapsed time and completion instant.
pub(crate) fn finish(
    name: &str,
    started: Instant,
    status: ProbeStatus,
    message: String,
    details: Option<Value>,
) -> ConnectionStatus {
    ConnectionStatus {
        name: name.to_string(),
        status,
        message,
        response_time_ms: Some(started.elapsed().as_millis() as u64),
        details,
        timestamp: Utc::now(),
    }
}
