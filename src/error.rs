use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse fault in {document}: {fault}")]
    Parse {
        document: String,
        #[source]
        fault: ParseFault,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failure to list or retrieve a journal document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-layer failure (DNS, refused connection, timeout).
    #[error("network error fetching {locator}: {source}")]
    Network {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{locator} returned HTTP {status}")]
    Status { locator: String, status: u16 },

    /// The server sent a document that has not been converted to text.
    #[error("{locator} is served as {content_type}, not as text")]
    NotText {
        locator: String,
        content_type: String,
    },

    #[error("unable to read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Transient faults skip the document; anything else stops the run.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network { .. } | FetchError::Io { .. } => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::NotText { .. } => false,
        }
    }
}

/// A parsing-boundary bug. Never expected on well-formed input and never
/// downgraded to a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFault {
    #[error("ROLL CALL marker found while still collecting votes for motion: {motion}")]
    ModeConflict { motion: String },

    #[error("vote data found in motion text: {motion}")]
    VoteDataInMotion { motion: String },
}

/// Recoverable problems in the source text. The affected document or vote
/// is dropped and scraping carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    MissingDate { document: String },
    UnparseableDate { document: String, date: String },
    MissingBillOrMotion { motion: String, line: String },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::MissingDate { document } => {
                write!(f, "No date was found for {document}; skipping")
            }
            DataQualityWarning::UnparseableDate { document, date } => {
                write!(f, "Could not parse date {date:?} in {document}; skipping")
            }
            DataQualityWarning::MissingBillOrMotion { motion, line } => write!(
                f,
                "No motion or bill name found: motion name: {motion}; decision text: {line}"
            ),
        }
    }
}
