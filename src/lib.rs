//! ocrmail - extract email addresses from images with OCR.
//!
//! One image source (local path or HTTP(S) URL) goes through a linear
//! pipeline: [`source`] classification, [`loader`] decoding, [`ocr`]
//! recognition and [`matcher`] extraction, sequenced by [`pipeline`].

pub mod cli;
pub mod config;
pub mod error;
pub mod http_client;
pub mod loader;
pub mod matcher;
pub mod ocr;
pub mod pipeline;
pub mod source;

pub use error::{ExtractError, Stage, StageError};
pub use loader::RasterImage;
pub use ocr::{OcrBackend, OcrError, PageSegMode, RecognizedText};
pub use pipeline::{Outcome, Pipeline};
pub use source::ImageSource;
