use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,https://fancloud.vercel.app";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses and validates configuration through an injectable lookup so tests
/// can drive it from a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("FANCLOUD_ENV", "development"))?;

    let bind_addr = or_default("FANCLOUD_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FANCLOUD_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("FANCLOUD_LOG_LEVEL", "info");
    let cors_origins = split_list(&or_default("FANCLOUD_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));

    let db_max_connections = parse_u32("FANCLOUD_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FANCLOUD_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FANCLOUD_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let wiki_api_url = or_default("FANCLOUD_WIKI_API_URL", "https://ja.wikipedia.org/w/api.php");
    if !wiki_api_url.starts_with("http://") && !wiki_api_url.starts_with("https://") {
        return Err(invalid(
            "FANCLOUD_WIKI_API_URL",
            format!("expected an http(s) URL, got '{wiki_api_url}'"),
        ));
    }
    let wiki_timeout_secs = parse_u64("FANCLOUD_WIKI_TIMEOUT_SECS", "30")?;
    let wiki_user_agent = or_default("FANCLOUD_WIKI_USER_AGENT", "fancloud/0.1 (oshi-profile)");

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        cors_origins,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        wiki_api_url,
        wiki_timeout_secs,
        wiki_user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FANCLOUD_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
