//! Pure summary statistics over a yearly crime series.

use serde::{Deserialize, Serialize};

use crate::client::CrimeDataPoint;

/// Direction of the series across its two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// Derived aggregates, recomputed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeStatistics {
    pub total: u64,
    pub average: u64,
    pub min: u64,
    pub max: u64,
    pub trend: Trend,
    pub change_percent: f64,
}

/// Reduce a series to summary aggregates and a trend classification.
///
/// The series is split at the midpoint in input order (the first half gets
/// the smaller share on odd counts) and the half means are compared; a swing
/// beyond ±5% classifies the trend. A zero first-half mean makes relative
/// change undefined, so that case reports stable at 0%.
pub fn compute(series: &[CrimeDataPoint]) -> CrimeStatistics {
    if series.is_empty() {
        return CrimeStatistics {
            total: 0,
            average: 0,
            min: 0,
            max: 0,
            trend: Trend::Stable,
            change_percent: 0.0,
        };
    }

    let values: Vec<u64> = series.iter().map(|point| point.actual).collect();
    let total: u64 = values.iter().sum();
    let average = (total as f64 / values.len() as f64).round() as u64;
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);

    let (first, second) = values.split_at(values.len() / 2);
    let change_percent = match (mean(first), mean(second)) {
        (Some(first_mean), Some(second_mean)) if first_mean > 0.0 => {
            round_one_decimal((second_mean - first_mean) / first_mean * 100.0)
        }
        _ => 0.0,
    };

    let trend = if change_percent > 5.0 {
        Trend::Increasing
    } else if change_percent < -5.0 {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    CrimeStatistics {
        total,
        average,
        min,
        max,
        trend,
        change_percent,
    }
}

fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<u64>() as f64 / values.len() as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
