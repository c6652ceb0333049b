//! Retrying client for the FBI crime statistics API.

pub mod mock;
pub mod transport;

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use clap::ValueEnum;
use futures::future::join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{config::Settings, error::CrimeApiError};
use self::transport::{AttemptError, HttpTransport, Sleeper, TokioSleeper, Transport};

/// One year of reported figures for a single offense and agency.
///
/// Field names follow the upstream wire format. Records are immutable once
/// produced and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeDataPoint {
    pub data_year: i32,
    pub offense: String,
    pub actual: u64,
    pub cleared: u64,
    pub cleared_exceptionally: u64,
    pub actual_min: u64,
    pub actual_max: u64,
}

/// Wire envelope returned by the estimates endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeSeries {
    pub data: Vec<CrimeDataPoint>,
    pub total: u64,
}

/// Offense categories accepted by the estimates endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OffenseType {
    ViolentCrime,
    PropertyCrime,
    Homicide,
    Rape,
    Robbery,
    Assault,
    Burglary,
    Larceny,
    MotorVehicleTheft,
}

impl OffenseType {
    pub const ALL: [Self; 9] = [
        Self::ViolentCrime,
        Self::PropertyCrime,
        Self::Homicide,
        Self::Rape,
        Self::Robbery,
        Self::Assault,
        Self::Burglary,
        Self::Larceny,
        Self::MotorVehicleTheft,
    ];

    /// Path segment used by the upstream API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViolentCrime => "violent-crime",
            Self::PropertyCrime => "property-crime",
            Self::Homicide => "homicide",
            Self::Rape => "rape",
            Self::Robbery => "robbery",
            Self::Assault => "assault",
            Self::Burglary => "burglary",
            Self::Larceny => "larceny",
            Self::MotorVehicleTheft => "motor-vehicle-theft",
        }
    }

    /// Human-readable label for form controls and summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::ViolentCrime => "Violent Crime",
            Self::PropertyCrime => "Property Crime",
            Self::Homicide => "Homicide",
            Self::Rape => "Rape",
            Self::Robbery => "Robbery",
            Self::Assault => "Assault",
            Self::Burglary => "Burglary",
            Self::Larceny => "Larceny",
            Self::MotorVehicleTheft => "Motor Vehicle Theft",
        }
    }
}

impl fmt::Display for OffenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for offense labels outside the fixed enumeration.
#[derive(Debug, Error)]
#[error("unknown offense type: {0}")]
pub struct UnknownOffense(pub String);

impl FromStr for OffenseType {
    type Err = UnknownOffense;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|offense| offense.as_str() == raw)
            .ok_or_else(|| UnknownOffense(raw.to_string()))
    }
}

/// Retries beyond the initial attempt.
const MAX_RETRIES: u32 = 3;
/// Base unit of the linear backoff schedule (1s, 2s, 3s).
const BASE_DELAY: Duration = Duration::from_millis(1000);
/// Per-attempt deadline on the estimates endpoint.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the estimates endpoint with bounded retry and an optional
/// mock-data fallback for upstream outages.
pub struct CrimeApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl CrimeApiClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(settings.api_key.clone(), FETCH_TIMEOUT)?;
        Ok(Self::with_parts(
            settings.api_base_url.clone(),
            Arc::new(transport),
            Arc::new(TokioSleeper),
        ))
    }

    /// Build a client over a custom transport and sleeper. Tests use this to
    /// script responses and observe the backoff schedule without touching
    /// the network or the real clock.
    pub fn with_parts(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            sleeper,
        }
    }

    /// Fetch yearly estimates for one agency and offense over `[start_year,
    /// end_year]`.
    ///
    /// Transient upstream failures (502/503/504, timeout, no response) are
    /// retried up to three more times with delays of 1s, 2s, 3s. If every
    /// attempt fails on a gateway status and `allow_mock_fallback` is set, a
    /// synthetic series is substituted so the dashboard stays usable through
    /// the outage.
    pub async fn crime_estimates(
        &self,
        agency_code: &str,
        offense: OffenseType,
        start_year: i32,
        end_year: i32,
        allow_mock_fallback: bool,
    ) -> Result<CrimeSeries, CrimeApiError> {
        let url = format!(
            "{base}/estimates/agencies/agency/{agency_code}/offenses/{offense}/{start_year}/{end_year}",
            base = self.base_url.trim_end_matches('/'),
        );

        let mut last = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_DELAY * attempt;
                info!(attempt, ?delay, "retrying crime estimates request");
                self.sleeper.sleep(delay).await;
            }

            match self.transport.fetch(&url).await {
                Ok(series) => return Ok(series),
                Err(outcome) => {
                    if should_retry(&outcome, MAX_RETRIES - attempt) {
                        last = Some(outcome);
                        continue;
                    }
                    if is_transient(&outcome) {
                        // Out of attempts; the fallback decision happens below.
                        last = Some(outcome);
                        break;
                    }
                    return Err(classify(outcome, agency_code));
                }
            }
        }

        match last {
            Some(AttemptError::Status { code, .. }) if allow_mock_fallback => {
                warn!(%url, status = code, "statistics API unavailable, serving mock data");
                Ok(mock::series(offense, start_year, end_year))
            }
            Some(outcome) => Err(classify(outcome, agency_code)),
            None => Err(CrimeApiError::Network(
                "request loop finished without an attempt".to_string(),
            )),
        }
    }

    /// Fetch several offense types in parallel for comparison.
    ///
    /// Each offense is an independent branch: one failing fetch maps to an
    /// empty series for that offense only and never cancels its siblings.
    /// Result order follows the requested order.
    pub async fn multiple_offenses(
        &self,
        agency_code: &str,
        offenses: &[OffenseType],
        start_year: i32,
        end_year: i32,
    ) -> IndexMap<OffenseType, CrimeSeries> {
        let fetches = offenses.iter().map(|&offense| async move {
            let series = match self
                .crime_estimates(agency_code, offense, start_year, end_year, true)
                .await
            {
                Ok(series) => series,
                Err(err) => {
                    warn!(%offense, %err, "offense fetch failed, returning empty series");
                    CrimeSeries::default()
                }
            };
            (offense, series)
        });
        join_all(fetches).await.into_iter().collect()
    }
}

/// Retry policy: a transient outcome with attempts remaining is retried.
fn should_retry(outcome: &AttemptError, attempts_remaining: u32) -> bool {
    attempts_remaining > 0 && is_transient(outcome)
}

/// Transient failures per the upstream contract: gateway errors or no usable
/// response.
fn is_transient(outcome: &AttemptError) -> bool {
    matches!(
        outcome,
        AttemptError::Status {
            code: 502 | 503 | 504,
            ..
        } | AttemptError::Timeout
            | AttemptError::Network(_)
    )
}

fn classify(outcome: AttemptError, agency_code: &str) -> CrimeApiError {
    match outcome {
        AttemptError::Status {
            code: code @ (502 | 503 | 504),
            ..
        } => CrimeApiError::ServiceUnavailable { status: code },
        AttemptError::Status { code: 404, .. } => CrimeApiError::NotFound {
            agency: agency_code.to_string(),
        },
        AttemptError::Status {
            code: 401 | 403, ..
        } => CrimeApiError::Unauthorized,
        AttemptError::Status { code, reason } => CrimeApiError::Upstream {
            status: code,
            reason,
        },
        AttemptError::Timeout => CrimeApiError::Timeout,
        AttemptError::Network(reason) => CrimeApiError::Network(reason),
        AttemptError::Decode { status, reason } => CrimeApiError::Upstream {
            status,
            reason: format!("unreadable response body: {reason}"),
        },
    }
}
