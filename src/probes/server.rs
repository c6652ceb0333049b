//! Self probe against this instance's own health endpoint.

use std::time::{Duration, Instant};

use serde_json::json;

use super::{finish, ConnectionStatus, ProbeStatus};
use crate::config::Settings;

const NAME: &str = "Web Server";
const TIMEOUT: Duration = Duration::from_secs(10);

pub async fn probe(settings: &Settings) -> ConnectionStatus {
    let started = Instant::now();
    let url = format!(
        "{}/api/health",
        settings.self_base_url.trim_end_matches('/')
    );

    let client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(err) => {
            return finish(
                NAME,
                started,
                ProbeStatus::Error,
                format!("cannot build HTTP client: {err}"),
                None,
            )
        }
    };

    match client.get(&url).timeout(TIMEOUT).send().await {
        Ok(response) if response.status().is_success() => {
            let details = response.json::<serde_json::Value>().await.ok();
            finish(
                NAME,
                started,
                ProbeStatus::Success,
                "Server is running and responsive".to_string(),
                details,
            )
        }
        Ok(response) => {
            let code = response.status().as_u16();
            finish(
                NAME,
                started,
                ProbeStatus::Warning,
                format!("Server responded with status {code}"),
                Some(json!({ "status_code": code })),
            )
        }
        Err(err) => {
            let message = if err.is_timeout() {
                "Health endpoint timed out".to_string()
            } else {
                format!("Cannot reach server: {err}")
            };
            finish(
                NAME,
                started,
                ProbeStatus::Error,
                message,
                Some(json!({ "error": err.to_string() })),
            )
        }
    }
}
