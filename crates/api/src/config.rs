use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use gatehouse_core::token::{SigningSecret, DEFAULT_TOKEN_TTL_HOURS};
use gatehouse_db::{SchemaError, TableNames};

/// Upper bound on `JWT_TTL_HOURS` (five years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 5 * 365 * 24;

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Tables(#[from] SchemaError),
}

/// Which origins the CORS layer admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `CORS_ORIGINS=*`
    Any,
    List(Vec<HeaderValue>),
}

/// Database connection settings. `Debug` hides the URL, which usually
/// carries a password.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: SigningSecret,
    /// Token lifetime in hours (default: 72).
    pub token_ttl_hours: i64,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment stage (`APP_ENV`), which picks the default table names.
    pub app_env: String,
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseConfig,
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub tables: TableNames,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `APP_ENV`              | `production`               |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `DATABASE_URL`         | **required**               |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `JWT_SECRET`           | **required**, non-empty    |
    /// | `JWT_TTL_HOURS`        | `72`                       |
    /// | `CORS_ORIGINS`         | `*`                        |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `USERS_TABLE`          | stage default              |
    /// | `ROLES_TABLE`          | stage default              |
    /// | `USER_ROLES_TABLE`     | stage default              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "production".into());

        let host = parse_or(&lookup, "HOST", "0.0.0.0".parse::<IpAddr>().ok())?;
        let port = parse_or(&lookup, "PORT", Some(5000u16))?;

        let database = DatabaseConfig {
            url: required(&lookup, "DATABASE_URL")?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", Some(20u32))?,
        };

        let token_ttl_hours: i64 =
            parse_or(&lookup, "JWT_TTL_HOURS", Some(DEFAULT_TOKEN_TTL_HOURS))?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                value: token_ttl_hours.to_string(),
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}"),
            });
        }
        let jwt = JwtConfig {
            secret: SigningSecret::new(required(&lookup, "JWT_SECRET")?),
            token_ttl_hours,
        };

        let cors_origins = parse_cors_origins(lookup("CORS_ORIGINS").as_deref().unwrap_or("*"))?;
        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", Some(30u64))?;

        let stage_tables = TableNames::for_stage(&app_env)?;
        let tables = TableNames::new(
            lookup("USERS_TABLE").unwrap_or_else(|| stage_tables.users().to_string()),
            lookup("ROLES_TABLE").unwrap_or_else(|| stage_tables.roles().to_string()),
            lookup("USER_ROLES_TABLE").unwrap_or_else(|| stage_tables.user_roles().to_string()),
        )?;

        Ok(Self {
            app_env,
            host,
            port,
            database,
            cors_origins,
            request_timeout_secs,
            tables,
            jwt,
        })
    }
}

/// Read a non-empty value.
fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Parse a value, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, name: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}

fn parse_cors_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
