//! Database probe.
//!
//! A database is optional: no configuration and no linked driver both map
//! to a warning, never an error. Only a configured database whose driver is
//! present and fails to answer reports as an error.

use std::time::Instant;

use serde_json::json;

use super::{finish, ConnectionStatus, ProbeStatus};
use crate::{config::Settings, db};

const NAME: &str = "Database";

pub async fn probe(settings: &Settings) -> ConnectionStatus {
    let started = Instant::now();

    let Some(config) = db::detect_config(settings) else {
        let supported: Vec<&str> = db::DatabaseKind::ALL.iter().map(|k| k.as_str()).collect();
        return finish(
            NAME,
            started,
            ProbeStatus::Warning,
            "Database not configured (optional)".to_string(),
            Some(json!({
                "note": "A database is optional; set DATABASE_URL or DATABASE_TYPE to enable one",
                "supported": supported,
            })),
        );
    };

    let Some(driver) = db::driver_for(config.kind) else {
        return finish(
            NAME,
            started,
            ProbeStatus::Warning,
            format!("{} driver not built into this binary", config.kind),
            Some(json!({
                "type": config.kind.as_str(),
                "hint": "rebuild with the matching cargo feature to enable this driver",
            })),
        );
    };

    match driver.ping(&config).await {
        Ok(()) => finish(
            NAME,
            started,
            ProbeStatus::Success,
            format!("{} connection successful", config.kind.as_str().to_uppercase()),
            Some(json!({ "type": config.kind.as_str(), "status": "connected" })),
        ),
        Err(err) => finish(
            NAME,
            started,
            ProbeStatus::Error,
            format!("Database connection failed: {err}"),
            Some(json!({ "type": config.kind.as_str(), "error": err.to_string() })),
        ),
    }
}
