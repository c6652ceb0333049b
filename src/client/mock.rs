//! Synthetic series generation for degraded-mode fallback.
//!
//! Shape matters more than exact values here: monotonic-ish growth with
//! noise and a plausible clearance ratio, enough to keep the dashboard
//! readable while the real API is down.

use rand::Rng;

use super::{CrimeDataPoint, CrimeSeries, OffenseType};

/// Baseline yearly count the synthetic series is shaped around.
const BASE_COUNT: f64 = 1000.0;
/// Year-over-year growth applied on top of the noise.
const GROWTH_RATE: f64 = 0.02;

/// Generate a plausible series with the thread RNG.
pub fn series(offense: OffenseType, start_year: i32, end_year: i32) -> CrimeSeries {
    series_with(&mut rand::thread_rng(), offense, start_year, end_year)
}

/// Generate one record per year in `[start_year, end_year]` inclusive from
/// the supplied RNG. Callers needing reproducible output pass a seeded RNG.
pub fn series_with<R: Rng + ?Sized>(
    rng: &mut R,
    offense: OffenseType,
    start_year: i32,
    end_year: i32,
) -> CrimeSeries {
    let mut data = Vec::new();
    for year in start_year..=end_year {
        let variation = rng.gen_range(-0.15..=0.15);
        let years_from_start = f64::from(year - start_year);
        let actual = (BASE_COUNT * (1.0 + variation) * (1.0 + years_from_start * GROWTH_RATE)).round();
        let clearance = rng.gen_range(0.30..=0.50);
        let cleared = (actual * clearance).round();

        data.push(CrimeDataPoint {
            data_year: year,
            offense: offense.to_string(),
            actual: actual as u64,
            cleared: cleared as u64,
            cleared_exceptionally: (cleared * 0.10).round() as u64,
            actual_min: (actual * 0.90).round() as u64,
            actual_max: (actual * 1.10).round() as u64,
        });
    }

    let total = data.len() as u64;
    CrimeSeries { data, total }
}
