//! OCR backend abstraction.
//!
//! The pipeline only talks to [`OcrBackend`]; Tesseract is the one engine
//! shipped, and tests substitute their own.

use thiserror::Error;

use crate::loader::RasterImage;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Invalid OCR option: {0}")]
    InvalidOption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Tesseract page segmentation mode (`--psm`), 0 through 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSegMode(u8);

impl PageSegMode {
    pub const MAX: u8 = 13;

    /// Assume a single uniform block of text.
    pub const SINGLE_BLOCK: PageSegMode = PageSegMode(6);

    pub fn new(mode: u8) -> Result<Self, OcrError> {
        if mode > Self::MAX {
            return Err(OcrError::InvalidOption(format!(
                "page segmentation mode must be 0-{}, got {}",
                Self::MAX,
                mode
            )));
        }
        Ok(Self(mode))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Text recognized from one image, one entry per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedText {
    pages: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl RecognizedText {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            processing_time_ms: 0,
        }
    }

    /// Build from raw engine output, where pages are separated by form
    /// feeds. Blank pages are dropped.
    pub fn from_engine_output(output: &str) -> Self {
        let pages = output
            .split('\x0c')
            .map(|page| page.trim_end().to_string())
            .filter(|page| !page.trim().is_empty())
            .collect();
        Self::new(pages)
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// All pages joined with newlines.
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.chars().count()).sum()
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Check if this backend can run (binary installed, etc).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Run OCR on a decoded image. `psm` overrides the backend's configured
    /// page segmentation mode for this call.
    fn recognize(
        &self,
        image: &RasterImage,
        psm: Option<PageSegMode>,
    ) -> Result<RecognizedText, OcrError>;
}
