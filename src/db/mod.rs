//! Optional database support: configuration detection and the driver
//! registry.
//!
//! Drivers are capability-checked at build time: the registry only contains
//! drivers actually linked into this binary, so probing a kind without one
//! degrades gracefully instead of creating a hard dependency.

#[cfg(feature = "duckdb")]
pub mod duck;

use std::fmt;

use async_trait::async_trait;

use crate::config::Settings;

/// Supported database type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Postgresql,
    Mongodb,
    Mysql,
    Sqlite,
    Duckdb,
}

impl DatabaseKind {
    pub const ALL: [Self; 5] = [
        Self::Postgresql,
        Self::Mongodb,
        Self::Mysql,
        Self::Sqlite,
        Self::Duckdb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mongodb => "mongodb",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Duckdb => "duckdb",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved connection parameters for one database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub kind: DatabaseKind,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Read the optional database section out of the settings.
///
/// Returns `None` when nothing is configured, an accepted operating mode
/// rather than an error. A bare `DATABASE_URL` has its kind sniffed from the
/// scheme;
/// an explicit `DATABASE_TYPE` takes over when the scheme is ambiguous.
pub fn detect_config(settings: &Settings) -> Option<DatabaseConfig> {
    if let Some(url) = &settings.database_url {
        if let Some(kind) = kind_from_url(url) {
            return Some(DatabaseConfig {
                kind,
                url: Some(url.clone()),
                host: None,
                port: None,
                name: None,
                user: None,
                password: None,
            });
        }
    }

    let tag = settings.database_type.as_deref()?;
    let kind = DatabaseKind::parse(tag)?;
    Some(DatabaseConfig {
        kind,
        url: settings.database_url.clone(),
        host: settings.database_host.clone(),
        port: settings.database_port,
        name: settings.database_name.clone(),
        user: settings.database_user.clone(),
        password: settings.database_password.clone(),
    })
}

fn kind_from_url(url: &str) -> Option<DatabaseKind> {
    if url.starts_with("postgresql://") || url.starts_with("postgres://") {
        Some(DatabaseKind::Postgresql)
    } else if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
        Some(DatabaseKind::Mongodb)
    } else if url.starts_with("mysql://") {
        Some(DatabaseKind::Mysql)
    } else if url.starts_with("sqlite://") || url.ends_with(".db") {
        Some(DatabaseKind::Sqlite)
    } else if url.starts_with("duckdb://") || url.ends_with(".duckdb") {
        Some(DatabaseKind::Duckdb)
    } else {
        None
    }
}

/// A database driver linked into this build.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    fn kind(&self) -> DatabaseKind;

    /// Open a connection and run a trivial liveness query.
    async fn ping(&self, config: &DatabaseConfig) -> anyhow::Result<()>;
}

/// Drivers compiled into this binary. Kinds absent here probe as a warning,
/// never as a link-time dependency.
pub fn registry() -> Vec<&'static dyn DatabaseDriver> {
    #[allow(unused_mut)]
    let mut drivers: Vec<&'static dyn DatabaseDriver> = Vec::new();
    #[cfg(feature = "duckdb")]
    drivers.push(&duck::DuckDriver);
    drivers
}

pub fn driver_for(kind: DatabaseKind) -> Option<&'static dyn DatabaseDriver> {
    registry().into_iter().find(|driver| driver.kind() == kind)
}
