//! Extraction pipeline: resolve → load → recognize → match → report.
//!
//! Each stage runs only if the previous one succeeded. The first failure is
//! tagged with its [`Stage`], logged once here, and returned as
//! [`Outcome::Failed`]; nothing is retried and no partial result is kept.

use tracing::{error, info, info_span, Instrument};

use crate::error::{ExtractError, Stage, StageError};
use crate::http_client::HttpClient;
use crate::loader;
use crate::matcher;
use crate::ocr::{OcrBackend, OcrError, PageSegMode};
use crate::source::ImageSource;

/// Terminal result of one run.
#[derive(Debug)]
pub enum Outcome {
    /// At least one email was found, unique and in first-seen order.
    Matches(Vec<String>),
    /// The image was processed but contained no email addresses.
    NoMatches,
    Failed(StageError),
}

impl Outcome {
    /// Emails found, empty for `NoMatches` and `Failed`.
    pub fn emails(&self) -> &[String] {
        match self {
            Outcome::Matches(emails) => emails,
            Outcome::NoMatches | Outcome::Failed(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Runs one image source through every stage.
pub struct Pipeline {
    client: HttpClient,
    ocr: Box<dyn OcrBackend>,
    psm: Option<PageSegMode>,
}

impl Pipeline {
    pub fn new(client: HttpClient, ocr: Box<dyn OcrBackend>) -> Self {
        Self {
            client,
            ocr,
            psm: None,
        }
    }

    /// Override the backend's page segmentation mode for every run.
    pub fn with_psm(mut self, psm: Option<PageSegMode>) -> Self {
        self.psm = psm;
        self
    }

    /// Process one user-supplied source. Never panics on bad input; every
    /// failure comes back as [`Outcome::Failed`].
    pub async fn run(&self, input: &str) -> Outcome {
        let input = input.trim();
        let span = info_span!("extract", source = %input);

        async {
            match self.try_run(input).await {
                Ok(emails) if emails.is_empty() => {
                    info!("No matches found");
                    Outcome::NoMatches
                }
                Ok(emails) => Outcome::Matches(emails),
                Err(err) => {
                    error!(stage = %err.stage, "Failed to process '{}': {}", input, err.error);
                    Outcome::Failed(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_run(&self, input: &str) -> Result<Vec<String>, StageError> {
        info!("Resolving image source");
        let source =
            ImageSource::resolve(input).map_err(|e| StageError::new(Stage::Resolve, e))?;

        info!("Loading image from {}", source);
        let image = loader::load(&self.client, &source)
            .await
            .map_err(|e| StageError::new(Stage::Load, e))?;
        info!(
            "Loaded {}x{} {} image",
            image.width(),
            image.height(),
            image.format().to_mime_type()
        );

        info!("Running OCR with {}", self.ocr.name());
        if !self.ocr.is_available() {
            let err = OcrError::BackendNotAvailable(self.ocr.availability_hint());
            return Err(StageError::new(Stage::Recognize, ExtractError::Ocr(err)));
        }
        let text = self
            .ocr
            .recognize(&image, self.psm)
            .map_err(|e| StageError::new(Stage::Recognize, e.into()))?;
        drop(image);
        info!(
            "Recognized {} characters on {} page(s) in {}ms",
            text.char_count(),
            text.pages().len(),
            text.processing_time_ms
        );

        let emails = matcher::extract_pages(&text);
        info!("Extracted {} email(s)", emails.len());
        Ok(emails)
    }
}
