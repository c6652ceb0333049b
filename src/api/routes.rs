//! HTTP route handlers for Axum.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::{client::OffenseType, error::CrimeApiError, probes, stats};

use super::{
    types::{EstimatesDto, HealthResponse, HealthServices, OffenseDto},
    AppState,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        uptime: super::uptime_seconds(),
        environment: state.settings.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        services: HealthServices {
            server: "running",
            api: "available",
        },
    })
}

/// Run the full connection-test suite. The probes absorb their own failures;
/// this handler guards the aggregation itself so an internal fault still
/// answers with the declared shape, normalized to `down`.
pub async fn test_connections(State(state): State<AppState>) -> ApiResult<probes::TestResult> {
    let settings = state.settings.clone();
    match tokio::spawn(async move { probes::run_all(&settings).await }).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            error!(%err, "connection test aggregation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "overall": "down",
                    "message": err.to_string(),
                    "timestamp": Utc::now().to_rfc3339(),
                })),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimatesQuery {
    pub agency: String,
    pub offense: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Substitute mock data during upstream outages (default on).
    #[serde(default = "default_true")]
    pub mock_fallback: bool,
}

fn default_true() -> bool {
    true
}

pub async fn crime_estimates(
    State(state): State<AppState>,
    Query(query): Query<EstimatesQuery>,
) -> ApiResult<EstimatesDto> {
    let offense = parse_offense(&query.offense)?;
    if query.start_year > query.end_year {
        return Err(bad_request(format!(
            "start_year {} is after end_year {}",
            query.start_year, query.end_year
        )));
    }

    let series = state
        .client
        .crime_estimates(
            &query.agency,
            offense,
            query.start_year,
            query.end_year,
            query.mock_fallback,
        )
        .await
        .map_err(error_response)?;

    let statistics = stats::compute(&series.data);
    Ok(Json(EstimatesDto {
        total: series.total,
        statistics,
        records: series.data,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub agency: String,
    /// Comma-separated offense list.
    pub offenses: String,
    pub start_year: i32,
    pub end_year: i32,
}

pub async fn compare_offenses(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<IndexMap<String, EstimatesDto>> {
    let mut offenses = Vec::new();
    for raw in query.offenses.split(',') {
        offenses.push(parse_offense(raw.trim())?);
    }

    let results = state
        .client
        .multiple_offenses(&query.agency, &offenses, query.start_year, query.end_year)
        .await;

    let dto = results
        .into_iter()
        .map(|(offense, series)| {
            let statistics = stats::compute(&series.data);
            (
                offense.to_string(),
                EstimatesDto {
                    total: series.total,
                    statistics,
                    records: series.data,
                },
            )
        })
        .collect();
    Ok(Json(dto))
}

pub async fn list_offenses() -> Json<Vec<OffenseDto>> {
    Json(
        OffenseType::ALL
            .iter()
            .map(|offense| OffenseDto {
                value: offense.as_str(),
                label: offense.label(),
            })
            .collect(),
    )
}

fn parse_offense(raw: &str) -> Result<OffenseType, (StatusCode, Json<Value>)> {
    raw.parse()
        .map_err(|_| bad_request(format!("unknown offense type: {raw}")))
}

fn bad_request(message: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "error",
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

fn error_response(err: CrimeApiError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        CrimeApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        CrimeApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        CrimeApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        CrimeApiError::ServiceUnavailable { .. }
        | CrimeApiError::Network(_)
        | CrimeApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(json!({
            "status": "error",
            "message": err.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
