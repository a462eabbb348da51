use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mysql,
    Memory,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_pool_size: usize,
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: u64,
}

impl Config {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("mysql") => StoreBackend::Mysql,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if store_backend == StoreBackend::Mysql && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let config = Config {
            store_backend,
            database_url,
            database_pool_size: parse_or(&lookup, "DATABASE_POOL_SIZE", 10)?,
            host: parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_or(&lookup, "PORT", 4000)?,
            jwt_secret,
            jwt_expiration_minutes: token_lifetime(&lookup)?,
        };

        tracing::info!(backend = ?config.store_backend, port = config.port, "Config loaded");

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Longest accepted token lifetime, one year.
pub const MAX_JWT_EXPIRATION_MINUTES: u64 = 525_600;

fn token_lifetime<F>(lookup: &F) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let minutes: u64 = parse_or(lookup, "JWT_EXPIRATION_MINUTES", 480)?;

    if minutes == 0 || minutes > MAX_JWT_EXPIRATION_MINUTES {
        return Err(ConfigError::Invalid {
            name: "JWT_EXPIRATION_MINUTES",
            value: minutes.to_string(),
        });
    }

    Ok(minutes)
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
