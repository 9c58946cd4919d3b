use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("BRANDAUDIT_ENV", "development"))?;
    let log_level = or_default("BRANDAUDIT_LOG_LEVEL", "info");
    let language = or_default("BRANDAUDIT_LANGUAGE", "en");
    let apify_api_key = lookup("APIFY_API_KEY").ok().filter(|k| !k.is_empty());
    let fixtures_dir = lookup("BRANDAUDIT_FIXTURES_DIR")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from);

    let discovery_timeout_secs = parse_u64("BRANDAUDIT_DISCOVERY_TIMEOUT_SECS", "180")?;
    let profile_timeout_secs = parse_u64("BRANDAUDIT_PROFILE_TIMEOUT_SECS", "180")?;
    let recent_posts_limit = parse_usize("BRANDAUDIT_RECENT_POSTS_LIMIT", "20")?;
    let max_hashtags = parse_usize("BRANDAUDIT_MAX_HASHTAGS", "5")?;

    if discovery_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BRANDAUDIT_DISCOVERY_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    if profile_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BRANDAUDIT_PROFILE_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        language,
        apify_api_key,
        fixtures_dir,
        discovery_timeout_secs,
        profile_timeout_secs,
        recent_posts_limit,
        max_hashtags,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BRANDAUDIT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
