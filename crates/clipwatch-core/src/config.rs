use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. Every variable has a
/// default, so missing variables are never an error.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the real environment so it
/// can be tested against a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let data_dir = PathBuf::from(or_default("CLIPWATCH_DATA_DIR", "./data"));
    let log_level = or_default("CLIPWATCH_LOG_LEVEL", "info");
    let snapshot_max_age_days = parse_u64("CLIPWATCH_SNAPSHOT_MAX_AGE_DAYS", "7")?;
    let vk_access_token = lookup("CLIPWATCH_VK_ACCESS_TOKEN").ok();

    let scraper_request_timeout_secs = parse_u64("CLIPWATCH_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "CLIPWATCH_SCRAPER_USER_AGENT",
        "clipwatch/0.1 (viral-video-metrics)",
    );
    let scraper_max_retries = parse_u32("CLIPWATCH_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("CLIPWATCH_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5")?;
    let scraper_inter_platform_delay_ms =
        parse_u64("CLIPWATCH_SCRAPER_INTER_PLATFORM_DELAY_MS", "2000")?;

    Ok(AppConfig {
        data_dir,
        log_level,
        snapshot_max_age_days,
        vk_access_token,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_inter_platform_delay_ms,
    })
}
