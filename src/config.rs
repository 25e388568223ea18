use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::kpi::ExtractionThresholds;

pub const DEFAULT_BASE_URL: &str = "https://www.jhrth.co.jp";
pub const DEFAULT_IR_LIBRARY_URL: &str = "https://www.jhrth.co.jp/ja/ir/library.html";
pub const DEFAULT_PORTFOLIO_URL: &str = "https://www.jhrth.co.jp/ja/portfolio/review.html";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub output_path: PathBuf,
    pub base_url: String,
    pub ir_library_url: String,
    pub start_year: i32,
    pub end_year: i32,
    pub http_timeout_secs: u64,
    pub request_interval_secs: u64,
    pub download_max_retries: usize,
    pub user_agent: String,
    pub thresholds: ExtractionThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            output_path: PathBuf::from("hotel_kpi_comprehensive.json"),
            base_url: DEFAULT_BASE_URL.to_string(),
            ir_library_url: DEFAULT_IR_LIBRARY_URL.to_string(),
            start_year: 2015,
            end_year: 2025,
            http_timeout_secs: 60,
            request_interval_secs: 2,
            download_max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            thresholds: ExtractionThresholds::default(),
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let config = Config {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            output_path: env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            base_url: env::var("BASE_URL").unwrap_or(defaults.base_url),
            ir_library_url: env::var("IR_LIBRARY_URL").unwrap_or(defaults.ir_library_url),
            start_year: env_or("START_YEAR", defaults.start_year),
            end_year: env_or("END_YEAR", defaults.end_year),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            request_interval_secs: env_or("REQUEST_INTERVAL_SECS", defaults.request_interval_secs),
            download_max_retries: env_or("DOWNLOAD_MAX_RETRIES", defaults.download_max_retries),
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
            thresholds: ExtractionThresholds {
                occupancy_percent_threshold: env_or(
                    "OCCUPANCY_PERCENT_THRESHOLD",
                    defaults.thresholds.occupancy_percent_threshold,
                ),
                rate_min_jpy: env_or("RATE_MIN_JPY", defaults.thresholds.rate_min_jpy),
                rate_max_jpy: env_or("RATE_MAX_JPY", defaults.thresholds.rate_max_jpy),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_year > self.end_year {
            return Err(ConfigError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        Ok(())
    }

    /// Years covered by the configured range
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_secs(self.request_interval_secs)
    }
}
