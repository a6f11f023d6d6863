//! Environment-driven configuration.

use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub min_pool_size: u32,
    pub max_pool_size: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Require TLS when running against a managed database.
    pub ssl: bool,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            port: env_parse("PORT", 3000),
            database: DatabaseConfig::from_env(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let production = env_or("APP_ENV", "development") == "production";
        DatabaseConfig {
            host: env_or("DB_HOST", "localhost"),
            port: env_parse("DB_PORT", 5432),
            username: env_or("DB_USERNAME", "postgres"),
            password: env_or("DB_PASSWORD", ""),
            database: env_or("DB_NAME", "kosku"),
            min_pool_size: env_parse("DB_MIN_POOL_SIZE", 0),
            max_pool_size: env_parse("DB_MAX_POOL_SIZE", 5),
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS", 30),
            idle_timeout_secs: env_parse("DB_IDLE_TIMEOUT_SECS", 600),
            ssl: production,
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(if self.ssl {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_missing_or_bad_value() {
        assert_eq!(env_parse("KOSKU_TEST_UNSET_PORT", 3000u16), 3000);
        std::env::set_var("KOSKU_TEST_BAD_PORT", "not-a-number");
        assert_eq!(env_parse("KOSKU_TEST_BAD_PORT", 3000u16), 3000);
        std::env::remove_var("KOSKU_TEST_BAD_PORT");
    }
}
