use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Snapshots older than this are treated as "no prior data".
    pub snapshot_max_age_days: u64,
    pub vk_access_token: Option<String>,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// Pause between platform fetches within one collection run.
    pub scraper_inter_platform_delay_ms: u64,
}

impl AppConfig {
    /// Directory holding the historical snapshot archive.
    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.data_dir.join("history")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("snapshot_max_age_days", &self.snapshot_max_age_days)
            .field(
                "vk_access_token",
                &self.vk_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field(
                "scraper_inter_platform_delay_ms",
                &self.scraper_inter_platform_delay_ms,
            )
            .finish()
    }
}
