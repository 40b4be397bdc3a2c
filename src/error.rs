use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BilldashError {
    #[error("Config directory not found at {0}. Run 'billdash init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Bill {0} not found on the server. Use 'billdash list' to see current bills.")]
    BillNotFound(u64),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD (e.g., 2025-10-02)")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'. Expected a non-negative decimal (e.g., 100.00)")]
    InvalidAmount(String),

    #[error("Invalid status '{0}'. Use 'paid', 'unpaid', or 'pending'.")]
    InvalidStatus(String),

    #[error("Invalid month '{0}'. Use a full month name (e.g., 'October').")]
    InvalidMonth(String),

    #[error("Invalid year '{0}'. Expected a four-digit year (e.g., 2025)")]
    InvalidYear(String),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("API returned HTTP {status} for {url}")]
    ApiStatus { status: u16, url: String },

    #[error("Unexpected response from {url}: {source}")]
    BadResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BilldashError>;
