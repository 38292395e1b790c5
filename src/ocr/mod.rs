//! OCR adapter.
//!
//! Hands a decoded raster to an external OCR engine and returns the
//! recognized text. Tesseract (invoked as a subprocess) is the only engine;
//! it must be installed and on `PATH`, or configured by absolute path.

mod backend;
mod tesseract;

pub use backend::{OcrBackend, OcrError, PageSegMode, RecognizedText};
pub use tesseract::{TesseractBackend, TesseractConfig};
