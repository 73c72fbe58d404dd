use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum TributaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Unknown feed schema: {0}")]
    UnknownSchema(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read/write ledger at {path}: {source}")]
    LedgerIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode ledger at {path}: {source}")]
    LedgerDecode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Entry has no media URL")]
    EmptyUrl,

    #[error("Failed to launch downloader {program}: {source}")]
    DownloaderLaunch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Downloader exited with {status}")]
    DownloadFailed { status: String, output: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TributaryError>;
