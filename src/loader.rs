//! Image loading from local files and remote URLs.
//!
//! Both paths end in [`decode`], which sniffs the format from magic bytes
//! and only accepts PNG, JPEG, BMP and TIFF.

use std::io::ErrorKind;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};
use url::Url;

use crate::error::ExtractError;
use crate::http_client::HttpClient;
use crate::source::ImageSource;

/// Raster formats accepted for OCR.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

/// A decoded image ready for OCR.
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
    format: ImageFormat,
    origin: String,
}

impl RasterImage {
    pub fn new(image: DynamicImage, format: ImageFormat, origin: impl Into<String>) -> Self {
        Self {
            image,
            format,
            origin: origin.into(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Format the bytes were encoded in.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Path or URL the image was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Load an image from whichever source was resolved.
pub async fn load(client: &HttpClient, source: &ImageSource) -> Result<RasterImage, ExtractError> {
    match source {
        ImageSource::Local(path) => load_local(path),
        ImageSource::Remote(url) => load_remote(client, url).await,
    }
}

/// Fetch an image over HTTP and decode it.
pub async fn load_remote(client: &HttpClient, url: &Url) -> Result<RasterImage, ExtractError> {
    info!("Fetching image from {}", url);

    let response = client
        .get(url.as_str())
        .await
        .map_err(|e| ExtractError::network(url.as_str(), e))?;

    if let Some(content_type) = response.content_type() {
        debug!("Content-Type: {}", content_type);
    }
    if let Some(len) = response.content_length() {
        debug!("Content-Length: {}", len);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::network(url.as_str(), e))?;

    info!("Downloaded {} bytes from {}", bytes.len(), url);
    decode(&bytes, url.as_str())
}

/// Read an image file from disk and decode it.
///
/// A missing file is reported as [`ExtractError::NotFound`] without any
/// decode attempt.
pub fn load_local(path: &Path) -> Result<RasterImage, ExtractError> {
    info!("Reading image from {}", path.display());

    let bytes = std::fs::read(path)
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ExtractError::NotFound(path.to_path_buf()),
            _ => ExtractError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode(&bytes, &path.display().to_string())
}

/// Decode raw bytes into a [`RasterImage`].
pub fn decode(bytes: &[u8], origin: &str) -> Result<RasterImage, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Decode(format!("{} is empty", origin)));
    }

    let format = image::guess_format(bytes).map_err(|_| {
        ExtractError::Decode(format!(
            "{} is not a recognized image ({})",
            origin,
            describe_content(bytes)
        ))
    })?;

    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(ExtractError::Decode(format!(
            "unsupported image format {} in {} (expected PNG, JPEG, BMP or TIFF)",
            format.to_mime_type(),
            origin
        )));
    }

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ExtractError::Decode(format!("{}: {}", origin, e)))?;

    debug!(
        "Decoded {} image {}x{}",
        format.to_mime_type(),
        image.width(),
        image.height()
    );

    Ok(RasterImage::new(image, format, origin))
}

/// Best-effort MIME description of content that is not an image.
fn describe_content(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "unknown content".to_string())
}
