use std::{env, path::Path};

use common::Thresholds;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("unsupported database driver {0:?}, only sqlite is available")]
    UnsupportedDriver(String),
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub driver: String,
    pub server: String,
    pub database: String,
    pub integrated_auth: bool,
    pub bootstrap: bool,
    /// Thresholds written when the conditions row does not exist yet.
    pub seed: Thresholds,
    url_override: Option<String>,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        match &self.url_override {
            Some(url) => url.clone(),
            None => Path::new(&self.server)
                .join(&self.database)
                .to_string_lossy()
                .into_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub credentials: Credentials,
    pub session_ttl: chrono::Duration,
    pub log_filter: String,
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let driver = get("DB_DRIVER", "sqlite");
        if !driver.eq_ignore_ascii_case("sqlite") {
            return Err(ConfigError::UnsupportedDriver(driver));
        }

        let database = DatabaseConfig {
            driver,
            server: get("DB_SERVER", "."),
            database: get("DB_NAME", "motors.db"),
            integrated_auth: parse_bool("DB_INTEGRATED_AUTH", lookup("DB_INTEGRATED_AUTH"), false)?,
            bootstrap: parse_bool("DB_BOOTSTRAP", lookup("DB_BOOTSTRAP"), true)?,
            seed: Thresholds {
                current: parse("SEED_CURRENT_THRESHOLD", lookup("SEED_CURRENT_THRESHOLD"), 10.0)?,
                temperature: parse(
                    "SEED_TEMPERATURE_THRESHOLD",
                    lookup("SEED_TEMPERATURE_THRESHOLD"),
                    80.0,
                )?,
                vibration: parse(
                    "SEED_VIBRATION_THRESHOLD",
                    lookup("SEED_VIBRATION_THRESHOLD"),
                    5.0,
                )?,
            },
            url_override: lookup("DATABASE_URL"),
        };

        let ttl_hours: i64 = parse("SESSION_TTL_HOURS", lookup("SESSION_TTL_HOURS"), 24)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                value: ttl_hours.to_string(),
            });
        }

        Ok(Self {
            host: get("HTTP_HOST", "127.0.0.1"),
            port: parse("HTTP_PORT", lookup("HTTP_PORT"), 8080)?,
            database,
            credentials: Credentials {
                username: get("DASHBOARD_USERNAME", "admin"),
                password: get("DASHBOARD_PASSWORD", "password123"),
            },
            session_ttl: chrono::Duration::hours(ttl_hours),
            log_filter: get("RUST_LOG", "debug"),
        })
    }
}

fn parse<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
