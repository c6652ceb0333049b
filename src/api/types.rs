//! Shared DTOs for JSON responses.

use serde::Serialize;

use crate::{client::CrimeDataPoint, stats::CrimeStatistics};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
    pub environment: String,
    pub version: &'static str,
    pub services: HealthServices,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthServices {
    pub server: &'static str,
    pub api: &'static str,
}

/// One offense series plus its derived aggregates, the unit the dashboard
/// renders.
#[derive(Debug, Clone, Serialize)]
pub struct EstimatesDto {
    pub records: Vec<CrimeDataPoint>,
    pub total: u64,
    pub statistics: CrimeStatistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct OffenseDto {
    pub value: &'static str,
    pub label: &'static str,
}
