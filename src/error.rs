//! Error kinds for each pipeline stage.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::ocr::OcrError;

/// Failures a single extraction run can hit.
///
/// An empty match list is not represented here; see [`crate::pipeline::Outcome`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error(transparent)]
    Ocr(#[from] OcrError),
}

impl ExtractError {
    /// Build a `Network` error from a reqwest failure.
    pub fn network(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if let Some(status) = err.status() {
            format!("HTTP {}", status)
        } else {
            err.to_string()
        };
        ExtractError::Network {
            url: url.to_string(),
            message,
        }
    }
}

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Load,
    Recognize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Load => "load",
            Stage::Recognize => "recognize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An [`ExtractError`] tagged with the stage that produced it.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub error: ExtractError,
}

impl StageError {
    pub fn new(stage: Stage, error: ExtractError) -> Self {
        Self { stage, error }
    }
}
