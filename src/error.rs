use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidUrl(#[from] UrlValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    PageStructure(#[from] PageStructureError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Raised before any fetch when the base coverage URL has the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL has no scheme, expected e.g. https://fabtcg.com/en/coverage/<event>/results/")]
    MissingScheme,

    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("Not a coverage URL (expected .../coverage/<event>/results/): {0}")]
    NotCoveragePath(String),

    #[error("URL must end with /results/: {0}")]
    MissingResultsSegment(String),

    #[error("URL must stop at /results/ without a round number: {0}")]
    TrailingRoundSegment(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Page not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {code} for {url}")]
    Status { url: String, code: u16 },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// A missing page is how the coverage site says there are no more rounds.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageStructureError {
    #[error("Unrecognized coverage page layout: {reason}")]
    UnrecognizedLayout { reason: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
