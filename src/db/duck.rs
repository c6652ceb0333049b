#![cfg(feature = "duckdb")]

//! DuckDB driver for the capability registry.

use async_trait::async_trait;
use duckdb::Connection;

use super::{DatabaseConfig, DatabaseDriver, DatabaseKind};

pub struct DuckDriver;

#[async_trait]
impl DatabaseDriver for DuckDriver {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Duckdb
    }

    async fn ping(&self, config: &DatabaseConfig) -> anyhow::Result<()> {
        let path = config
            .url
            .as_deref()
            .map(|url| url.trim_start_matches("duckdb://").to_string())
            .unwrap_or_else(|| "./crimescope.duckdb".to_string());

        // duckdb's API is synchronous; keep the probe off the async workers.
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let conn = Connection::open(&path)?;
            conn.execute_batch("SELECT 1;")?;
            Ok(())
        })
        .await?
    }
}
