use std::env;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid {name} {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("cannot resolve {host:?}: {reason}")]
    Unresolvable { host: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    /// IP literal or hostname.
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
    /// Largest request body accepted, in bytes.
    pub max_body_size: usize,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let host = match lookup("HOST") {
            Some(host) if host.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    name: "HOST",
                    value: host,
                })
            }
            Some(host) => host.trim().to_string(),
            None => DEFAULT_HOST.to_string(),
        };
        let port = parse_or("PORT", &lookup, DEFAULT_PORT)?;
        let pool_size = positive("DATABASE_POOL_SIZE", &lookup, DEFAULT_POOL_SIZE)?;
        let max_body_size = positive("MAX_BODY_SIZE", &lookup, DEFAULT_MAX_BODY_SIZE)?;

        Ok(Config {
            database_url,
            host,
            port,
            pool_size,
            max_body_size,
        })
    }

    /// Resolves `host:port` to the first address the resolver returns.
    pub async fn resolve_addr(&self) -> Result<SocketAddr, ConfigError> {
        let unresolvable = |reason: String| ConfigError::Unresolvable {
            host: self.host.clone(),
            reason,
        };
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|err| unresolvable(err.to_string()))?
            .next()
            .ok_or_else(|| unresolvable("no addresses".to_string()))
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn positive<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq + ToString,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(name, lookup, default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}
