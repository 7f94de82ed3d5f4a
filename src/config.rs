// TecaiKids API - Configuration
// Resolved from environment variables; bin/server.rs loads an optional .env first

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "data";
pub const DEFAULT_DB_NAME: &str = "tecaikids";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8001";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Sentinel `DATABASE_URL` for a throwaway in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Where the document store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

/// Allowed cross-origin callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseLocation,
    pub db_name: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: CorsOrigins,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through `lookup`. Blank values count as unset,
    /// except `DB_NAME`, which must name a database when it is given.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_name = match lookup("DB_NAME") {
            None => DEFAULT_DB_NAME.to_string(),
            Some(raw) if raw.trim().is_empty() => bail!("DB_NAME is set but empty"),
            Some(raw) => raw.trim().to_string(),
        };
        if db_name.contains(['/', '\\']) {
            bail!("DB_NAME must be a plain name, got '{}'", db_name);
        }

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let database = if database_url == IN_MEMORY {
            DatabaseLocation::InMemory
        } else {
            DatabaseLocation::File(PathBuf::from(database_url).join(format!("{}.db", db_name)))
        };

        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: '{}'", bind))?;

        let cors_origins = parse_cors_origins(get("CORS_ORIGINS").as_deref().unwrap_or("*"));

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("LOG_FORMAT must be 'compact' or 'json', got '{}'", other),
        };

        Ok(Config {
            database,
            db_name,
            bind_addr,
            cors_origins,
            log_level,
            log_format,
        })
    }
}

/// `*` anywhere in the list means any origin.
fn parse_cors_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}
