//! HTTP layer exposing crime statistics queries, diagnostics, and static UI.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc, time::Instant};

use anyhow::Result;
use axum::{routing::get, Router};
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{client::CrimeApiClient, config::Settings};

/// Process start marker backing the health endpoint's uptime field.
static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

pub(crate) fn uptime_seconds() -> f64 {
    STARTED_AT.elapsed().as_secs_f64()
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: Arc<CrimeApiClient>,
}

/// Build the application router. Split out of [`serve`] so tests can drive
/// routes in-process.
pub fn router(settings: Settings) -> Result<Router> {
    let client = Arc::new(CrimeApiClient::new(&settings)?);
    let state = AppState { settings, client };
    let static_dir = ServeDir::new("ui/static");

    Ok(Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/test-connections", get(routes::test_connections))
        .route("/api/crime/estimates", get(routes::crime_estimates))
        .route("/api/crime/compare", get(routes::compare_offenses))
        .route("/api/offenses", get(routes::list_offenses))
        .fallback_service(static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    Lazy::force(&STARTED_AT);
    let app = router(settings)?;

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving crimescope API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
