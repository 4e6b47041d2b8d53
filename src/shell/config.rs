// Process configuration.
//
// Every setting can come from a flag or the environment; `.env` is loaded
// before parsing.

use crate::shared::infrastructure::aggregate_cache::CachePolicy;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "timesheet")]
#[command(version, about = "Timesheet tracker backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: AppConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP and GraphQL API (default)
    Serve,
    /// Clear the datalake and re-derive it from the time entry log
    RebuildDatalake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnvironment {
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    #[arg(long = "env", env = "APP_ENV", value_enum, default_value_t = AppEnvironment::Development)]
    pub environment: AppEnvironment,

    /// SQLite URL; in-memory adapters are used when absent
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    #[arg(long, env = "STATS_CACHE_TTL_SECS", default_value_t = 3600)]
    pub stats_cache_ttl_secs: u64,

    #[arg(long, env = "ENTITY_STATS_CACHE_TTL_SECS", default_value_t = 900)]
    pub entity_stats_cache_ttl_secs: u64,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "DATALAKE_BATCH_SIZE", default_value_t = 1000)]
    pub datalake_batch_size: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("DATABASE_URL must be a sqlite URL, got '{0}'")]
    UnsupportedDatabase(String),
}

impl AppConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("STATS_CACHE_TTL_SECS", self.stats_cache_ttl_secs),
            ("ENTITY_STATS_CACHE_TTL_SECS", self.entity_stats_cache_ttl_secs),
            ("REQUEST_TIMEOUT_SECS", self.request_timeout_secs),
            ("DATALAKE_BATCH_SIZE", self.datalake_batch_size),
        ] {
            if value == 0 {
                return Err(ConfigError::NotPositive(name));
            }
        }
        if let Some(url) = &self.database_url
            && !url.starts_with("sqlite:")
        {
            return Err(ConfigError::UnsupportedDatabase(url.clone()));
        }
        Ok(self)
    }

    /// Global stats are only cached in production.
    pub fn cache_policy(&self) -> CachePolicy {
        let global_stats_ttl = match self.environment {
            AppEnvironment::Production => Some(Duration::from_secs(self.stats_cache_ttl_secs)),
            AppEnvironment::Development | AppEnvironment::Test => None,
        };
        CachePolicy {
            global_stats_ttl,
            entity_stats_ttl: Duration::from_secs(self.entity_stats_cache_ttl_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
