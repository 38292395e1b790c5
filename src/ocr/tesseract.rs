//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction. The raster is
//! written to a temporary PNG and the recognized text is read from stdout.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;
use tracing::debug;

use super::backend::{OcrBackend, OcrError, PageSegMode, RecognizedText};
use crate::loader::RasterImage;

/// Tesseract invocation settings.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Binary name or path.
    pub command: String,
    /// Language for OCR (e.g., "eng", "eng+deu").
    pub language: String,
    /// OCR engine mode (`--oem`).
    pub oem: Option<u8>,
    /// Default page segmentation mode (`--psm`).
    pub psm: Option<PageSegMode>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            oem: Some(3),
            psm: Some(PageSegMode::SINGLE_BLOCK),
        }
    }
}

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: TesseractConfig,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: TesseractConfig::default(),
        }
    }

    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    fn build_args(&self, image_path: &Path, psm: Option<PageSegMode>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            image_path.into(),
            "stdout".into(),
            "-l".into(),
            self.config.language.as_str().into(),
        ];
        if let Some(oem) = self.config.oem {
            args.push("--oem".into());
            args.push(oem.to_string().into());
        }
        if let Some(psm) = psm.or(self.config.psm) {
            args.push("--psm".into());
            args.push(psm.value().to_string().into());
        }
        args
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path, psm: Option<PageSegMode>) -> Result<String, OcrError> {
        let output = Command::new(&self.config.command)
            .args(self.build_args(image_path, psm))
            .output();

        match output {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if output.status.success() {
                    if !stderr.trim().is_empty() {
                        debug!("tesseract: {}", stderr.trim());
                    }
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    Err(OcrError::OcrFailed(format!(
                        "tesseract exited with {}: {}",
                        output.status,
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.config.command
                )))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }

    /// Write the raster where Tesseract can read it.
    fn write_input(&self, image: &RasterImage, dir: &Path) -> Result<std::path::PathBuf, OcrError> {
        let path = dir.join("input.png");
        // PNG has no float pixel types.
        let owned;
        let source = match image.image() {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                owned = DynamicImage::ImageRgba8(image.image().to_rgba8());
                &owned
            }
            other => other,
        };
        source
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| OcrError::ImageError(e.to_string()))?;
        Ok(path)
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        which::which(&self.config.command).is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "Tesseract is available".to_string()
        } else {
            format!(
                "{} not installed. Install with: apt install tesseract-ocr (or brew install tesseract)",
                self.config.command
            )
        }
    }

    fn recognize(
        &self,
        image: &RasterImage,
        psm: Option<PageSegMode>,
    ) -> Result<RecognizedText, OcrError> {
        let start = Instant::now();

        let temp_dir = TempDir::new()?;
        let image_path = self.write_input(image, temp_dir.path())?;
        let stdout = self.run_tesseract(&image_path, psm)?;

        let mut text = RecognizedText::from_engine_output(&stdout);
        text.processing_time_ms = start.elapsed().as_millis() as u64;
        Ok(text)
    }
}
