//! Application configuration
//!
//! Built once at startup from environment variables and handed to the store,
//! the middleware stack and the router. Nothing reads the environment after
//! this point.

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::infrastructure::rate_limit::RateLimit;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (default "0.0.0.0")
    pub host: String,
    /// Port to bind (default 8000)
    pub port: u16,
    /// Peers whose `X-Forwarded-For` header is believed
    pub trusted_proxies: Vec<IpAddr>,
}

/// SQLite connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite://realtor.db`
    pub url: String,
    /// Maximum pooled connections
    pub pool_size: u32,
    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
    /// Connections older than this are closed and replaced
    pub max_lifetime: Option<Duration>,
}

/// Cross-origin policy
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins; a single "*" allows any origin
    pub allowed_origins: Vec<String>,
}

/// Per-client request ceilings
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub limits: Vec<RateLimit>,
}

/// Transport security
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Running with APP_ENV=production
    pub production: bool,
    /// Redirect plain HTTP to HTTPS (only honoured in production)
    pub force_https: bool,
}

/// Log output
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory of the rotating log file (unused in debug mode)
    pub log_dir: PathBuf,
    pub debug: bool,
}

const DEFAULT_RATE_LIMITS: &str = "200 per day;50 per hour";

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let debug = parse_flag(&var("DEBUG", "false"));
        let production = var("APP_ENV", "development").eq_ignore_ascii_case("production");

        let rate_limits = var("RATE_LIMITS", DEFAULT_RATE_LIMITS);
        let trusted_proxies = var("TRUSTED_PROXIES", "");

        Ok(Self {
            server: ServerConfig {
                host: var("HOST", "0.0.0.0"),
                port: var("PORT", "8000")
                    .parse()
                    .context("PORT must be a valid port number")?,
                trusted_proxies: trusted_proxies
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<IpAddr>())
                    .collect::<Result<_, _>>()
                    .with_context(|| {
                        format!("TRUSTED_PROXIES must be a list of IP addresses: {trusted_proxies}")
                    })?,
            },

            database: DatabaseConfig {
                url: var("DATABASE_URL", "sqlite://realtor.db"),
                pool_size: var("DB_POOL_SIZE", "5")
                    .parse()
                    .context("DB_POOL_SIZE must be a positive integer")?,
                acquire_timeout: Duration::from_secs(
                    var("DB_POOL_TIMEOUT", "30")
                        .parse()
                        .context("DB_POOL_TIMEOUT must be a number of seconds")?,
                ),
                max_lifetime: Some(Duration::from_secs(
                    var("DB_POOL_RECYCLE", "1800")
                        .parse()
                        .context("DB_POOL_RECYCLE must be a number of seconds")?,
                )),
            },

            cors: CorsConfig {
                allowed_origins: var("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },

            rate_limit: RateLimitConfig {
                enabled: parse_flag(&var("RATE_LIMIT_ENABLED", "true")),
                limits: RateLimit::parse_list(&rate_limits)
                    .with_context(|| format!("RATE_LIMITS is not valid: {rate_limits}"))?,
            },

            security: SecurityConfig {
                production,
                force_https: parse_flag(&var("FORCE_HTTPS", "true")),
            },

            logging: LoggingConfig {
                log_dir: PathBuf::from(var("LOG_DIR", "logs")),
                debug,
            },
        })
    }

    /// Socket address string for the listener.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    /// Private in-memory database. One connection that never expires, since
    /// every SQLite connection to `:memory:` sees its own database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: None,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl SecurityConfig {
    /// Whether plain HTTP requests get redirected.
    pub fn redirects_to_https(&self) -> bool {
        self.production && self.force_https
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert!(config.server.trusted_proxies.is_empty());
        assert_eq!(config.database.url, "sqlite://realtor.db");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(30));
        assert_eq!(config.database.max_lifetime, Some(Duration::from_secs(1800)));
        assert_eq!(config.cors.allowed_origins, vec!["*"]);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.limits.len(), 2);
        assert!(!config.security.redirects_to_https());
        assert_eq!(config.logging.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn pool_settings_come_from_environment() {
        let config = config_from(&[
            ("DB_POOL_SIZE", "10"),
            ("DB_POOL_TIMEOUT", "45"),
            ("DB_POOL_RECYCLE", "3600"),
        ])
        .unwrap();
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(45));
        assert_eq!(config.database.max_lifetime, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn server_settings_come_from_environment() {
        let config =
            config_from(&[("HOST", "127.0.0.1"), ("PORT", "9000"), ("DEBUG", "True")]).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert!(config.logging.debug);
    }

    #[test]
    fn trusted_proxies_are_parsed() {
        let config = config_from(&[("TRUSTED_PROXIES", "10.0.0.1, ::1,")]).unwrap();
        assert_eq!(
            config.server.trusted_proxies,
            vec![
                "10.0.0.1".parse::<IpAddr>().unwrap(),
                "::1".parse::<IpAddr>().unwrap()
            ]
        );
        assert!(config_from(&[("TRUSTED_PROXIES", "proxy.internal")]).is_err());
    }

    #[test]
    fn allowed_origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "ALLOWED_ORIGINS",
            "https://a.example, https://b.example,,",
        )])
        .unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn production_redirects_unless_disabled() {
        let config = config_from(&[("APP_ENV", "production")]).unwrap();
        assert!(config.security.redirects_to_https());

        let config = config_from(&[("APP_ENV", "production"), ("FORCE_HTTPS", "false")]).unwrap();
        assert!(!config.security.redirects_to_https());
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn invalid_rate_limit_is_an_error() {
        assert!(config_from(&[("RATE_LIMITS", "lots per fortnight")]).is_err());
    }

    #[test]
    fn in_memory_database_is_detected() {
        assert!(DatabaseConfig::in_memory().is_in_memory());
        assert!(!config_from(&[]).unwrap().database.is_in_memory());
    }
}
