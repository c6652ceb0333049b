//! CLI entry-point for querying crime estimates.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::instrument;

use crate::{
    client::{CrimeApiClient, CrimeSeries, OffenseType},
    config::Settings,
    stats::{self, CrimeStatistics},
};

/// Args for the `fetch` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Agency code, e.g. NJ1234567.
    #[arg(long)]
    pub agency: String,
    /// Offense types to query; repeat the flag to compare several.
    #[arg(long = "offense", value_enum, default_values_t = vec![OffenseType::ViolentCrime])]
    pub offenses: Vec<OffenseType>,
    #[arg(long, default_value_t = 2010)]
    pub start_year: i32,
    #[arg(long, default_value_t = 2022)]
    pub end_year: i32,
    /// Fail instead of substituting mock data when the API is down.
    #[arg(long)]
    pub no_mock_fallback: bool,
    /// Emit raw JSON instead of a readable summary.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let client = CrimeApiClient::new(&settings)?;

    if let &[offense] = args.offenses.as_slice() {
        let series = client
            .crime_estimates(
                &args.agency,
                offense,
                args.start_year,
                args.end_year,
                !args.no_mock_fallback,
            )
            .await?;
        let statistics = stats::compute(&series.data);
        emit(args.json, offense, &series, &statistics)?;
        return Ok(());
    }

    let results = client
        .multiple_offenses(&args.agency, &args.offenses, args.start_year, args.end_year)
        .await;
    for (offense, series) in &results {
        let statistics = stats::compute(&series.data);
        emit(args.json, *offense, series, &statistics)?;
    }
    Ok(())
}

fn emit(
    as_json: bool,
    offense: OffenseType,
    series: &CrimeSeries,
    statistics: &CrimeStatistics,
) -> Result<()> {
    if as_json {
        let payload = json!({
            "offense": offense,
            "records": series.data,
            "total": series.total,
            "statistics": statistics,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} ({} records)", offense.label(), series.data.len());
    for point in &series.data {
        println!(
            "  {}  reported {:>8}  cleared {:>8}",
            point.data_year, point.actual, point.cleared
        );
    }
    println!(
        "  total {}  avg {}  min {}  max {}  trend {} ({:+.1}%)",
        statistics.total,
        statistics.average,
        statistics.min,
        statistics.max,
        statistics.trend.as_str(),
        statistics.change_percent
    );
    Ok(())
}
