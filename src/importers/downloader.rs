use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("File not found (404): {0}")]
    NotFound(String),

    #[error("Server error (5xx): {0}")]
    ServerError(String),

    #[error("Unexpected response: {0}")]
    UnexpectedStatus(String),

    #[error("Failed to write report file: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Server errors and connection problems are worth another attempt
    fn is_transient(&self) -> bool {
        match self {
            DownloadError::ServerError(_) => true,
            DownloadError::HttpError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Downloads yearly hotel performance workbooks into a local cache directory
#[derive(Clone)]
pub struct ReportDownloader {
    client: Client,
    data_dir: PathBuf,
    max_retries: usize,
}

/// Cache file name for a year's workbook
pub fn report_file_name(year: i32) -> String {
    format!("jhr_{year}_hotel_performance.xlsx")
}

impl ReportDownloader {
    /// Create a downloader writing into `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_client(data_dir, Client::new(), 3)
    }

    pub fn with_settings(
        data_dir: impl Into<PathBuf>,
        timeout: Duration,
        user_agent: &str,
        max_retries: usize,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");
        Self::with_client(data_dir, client, max_retries)
    }

    fn with_client(data_dir: impl Into<PathBuf>, client: Client, max_retries: usize) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
            max_retries,
        }
    }

    /// Path where the workbook for `year` is cached
    pub fn cached_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(report_file_name(year))
    }

    /// Download the workbook for `year` unless it is already cached
    ///
    /// Returns the local path of the workbook.
    pub async fn download_report(&self, year: i32, url: &str) -> Result<PathBuf, DownloadError> {
        let path = self.cached_path(year);
        if path.exists() {
            info!("{}年 report already cached: {}", year, path.display());
            return Ok(path);
        }

        info!("Downloading {}年 report: {}", year, url);
        let filename = report_file_name(year);

        let bytes = (|| self.download_file(url, &filename))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(500))
                    .with_max_times(self.max_retries),
            )
            .when(DownloadError::is_transient)
            .notify(|err, delay| {
                warn!("Download of {} failed ({}), retrying in {:?}", filename, err, delay);
            })
            .await?;

        write_atomically(&self.data_dir, &path, &bytes)?;
        info!(
            "Saved {}年 report: {} ({} bytes)",
            year,
            path.display(),
            bytes.len()
        );
        Ok(path)
    }

    /// Internal helper to download a file from a URL
    async fn download_file(&self, url: &str, filename: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            debug!("Downloaded {filename} ({} bytes)", bytes.len());
            Ok(bytes.to_vec())
        } else if status.as_u16() == 404 {
            Err(DownloadError::NotFound(format!(
                "{filename} not found on server"
            )))
        } else if status.is_server_error() {
            Err(DownloadError::ServerError(format!(
                "Server error {status} while downloading {filename}"
            )))
        } else {
            match response.error_for_status() {
                Err(e) => Err(DownloadError::HttpError(e)),
                Ok(_) => Err(DownloadError::UnexpectedStatus(format!(
                    "status {status} while downloading {filename}"
                ))),
            }
        }
    }
}

/// Write through a temporary file in the target directory so a failed download
/// never leaves a truncated workbook in the cache
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    std::fs::create_dir_all(dir)?;
    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(bytes)?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
