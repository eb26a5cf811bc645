//! Command-line and environment configuration.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::backend::io::rest::DEFAULT_MAX_BODY_BYTES;
use crate::backend::storage::PoolSettings;

/// Deployment environment, reported by the health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

/// `movies-api` server arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "movies-api", about = "JSON HTTP API for movie records", version)]
pub struct Config {
    /// API server port.
    #[arg(long, env = "PORT", default_value_t = 4567)]
    pub port: u16,
    /// Environment name.
    #[arg(long = "env", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,
    /// SQLite data source name.
    #[arg(long = "db-dsn", env = "MOVIES_DB_DSN", default_value = "sqlite:movies.db")]
    pub db_dsn: String,
    /// Maximum open database connections.
    #[arg(long = "db-max-open-conns", default_value_t = 25)]
    pub db_max_open_conns: u32,
    /// Maximum idle database connections.
    #[arg(long = "db-max-idle-conns", default_value_t = 25)]
    pub db_max_idle_conns: u32,
    /// Seconds an idle connection may stay open.
    #[arg(long = "db-max-idle-time", value_name = "seconds", default_value_t = 900)]
    pub db_max_idle_time: u64,
    /// Largest accepted request body in bytes.
    #[arg(long = "max-body-bytes", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Config {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            dsn: self.db_dsn.clone(),
            max_open_conns: self.db_max_open_conns,
            // idle connections can never outnumber open ones
            max_idle_conns: self.db_max_idle_conns.min(self.db_max_open_conns),
            max_idle_time: Duration::from_secs(self.db_max_idle_time),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
