//! Probes for upstream reachability: the public internet and the statistics
//! API itself.

use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use serde_json::json;

use super::{finish, ConnectionStatus, ProbeStatus};
use crate::config::Settings;

const INTERNET_NAME: &str = "Internet Connection";
const INTERNET_TARGET: &str = "https://www.google.com/favicon.ico";
const INTERNET_TIMEOUT: Duration = Duration::from_secs(5);

const API_NAME: &str = "FBI Crime Statistics API";
const API_TIMEOUT: Duration = Duration::from_secs(10);

/// HEAD a well-known host; any completed response proves reachability, the
/// status itself is irrelevant.
pub async fn probe_internet() -> ConnectionStatus {
    let started = Instant::now();

    let client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(err) => {
            return finish(
                INTERNET_NAME,
                started,
                ProbeStatus::Error,
                format!("cannot build HTTP client: {err}"),
                None,
            )
        }
    };

    match client
        .head(INTERNET_TARGET)
        .timeout(INTERNET_TIMEOUT)
        .send()
        .await
    {
        Ok(_) => finish(
            INTERNET_NAME,
            started,
            ProbeStatus::Success,
            "Internet connectivity available".to_string(),
            None,
        ),
        Err(err) => finish(
            INTERNET_NAME,
            started,
            ProbeStatus::Error,
            "No internet connection detected".to_string(),
            Some(json!({ "error": err.to_string() })),
        ),
    }
}

/// Issue a minimal real query with fixed known-valid parameters against the
/// same endpoint the fetch client uses.
pub async fn probe_statistics_api(settings: &Settings) -> ConnectionStatus {
    let started = Instant::now();
    let url = format!(
        "{}/estimates/agencies/agency/NJ1234567/offenses/violent-crime/2020/2020",
        settings.api_base_url.trim_end_matches('/')
    );

    let client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(err) => {
            return finish(
                API_NAME,
                started,
                ProbeStatus::Error,
                format!("cannot build HTTP client: {err}"),
                None,
            )
        }
    };

    let request = client
        .get(&url)
        .query(&[("api_key", settings.api_key.as_str())])
        .header(ACCEPT, "application/json")
        .timeout(API_TIMEOUT);

    match request.send().await {
        Ok(response) if response.status().is_success() => {
            let code = response.status().as_u16();
            let has_data = response
                .json::<serde_json::Value>()
                .await
                .map(|body| body.get("data").is_some())
                .unwrap_or(false);
            finish(
                API_NAME,
                started,
                ProbeStatus::Success,
                "API connection successful".to_string(),
                Some(json!({ "status_code": code, "has_data": has_data })),
            )
        }
        Ok(response) => {
            let code = response.status().as_u16();
            finish(
                API_NAME,
                started,
                ProbeStatus::Error,
                format!("API returned status {code}"),
                Some(json!({ "status_code": code })),
            )
        }
        Err(err) => {
            let message = if err.is_timeout() {
                "Request timeout (10s)".to_string()
            } else {
                format!("Connection failed: {err}")
            };
            finish(
                API_NAME,
                started,
                ProbeStatus::Error,
                message,
                Some(json!({ "error": err.to_string() })),
            )
        }
    }
}
