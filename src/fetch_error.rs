#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to parse HTML data")]
    ParseError,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
