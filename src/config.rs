//! Runtime configuration utilities for crimescope.

use std::env;

use serde::Deserialize;

const DEFAULT_API_BASE_URL: &str = "https://api.usa.gov/crime/fbi/sapi/api";

/// Application configuration resolved from `.env` and defaults.
///
/// Every database field is optional; a fully absent database section is a
/// supported operating mode, not a misconfiguration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the FBI crime statistics API.
    pub api_base_url: String,
    /// API key sent with every statistics request.
    pub api_key: String,
    /// Deployment environment reported by the health endpoint.
    pub environment: String,
    /// Base URL this instance answers on, targeted by the self probe.
    pub self_base_url: String,
    /// Database connection URL, if one is configured.
    pub database_url: Option<String>,
    /// Explicit database type tag, if one is configured.
    pub database_type: Option<String>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub database_name: Option<String>,
    pub database_user: Option<String>,
    pub database_password: Option<String>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let api_base_url =
            env::var("FBI_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_key = env::var("FBI_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string());
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let self_base_url =
            env::var("SELF_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        Ok(Self {
            api_base_url,
            api_key,
            environment,
            self_base_url,
            database_url: env::var("DATABASE_URL").ok(),
            database_type: env::var("DATABASE_TYPE").ok(),
            database_host: env::var("DATABASE_HOST").ok(),
            database_port: env::var("DATABASE_PORT").ok().and_then(|v| v.parse().ok()),
            database_name: env::var("DATABASE_NAME").ok(),
            database_user: env::var("DATABASE_USER").ok(),
            database_password: env::var("DATABASE_PASSWORD").ok(),
        })
    }
}
