//! Classification of the user-supplied image source.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::ExtractError;

/// Where the image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Local(PathBuf),
    Remote(Url),
}

impl ImageSource {
    /// Classify a raw input string.
    ///
    /// - absolute `http://` / `https://` URLs with a host become [`ImageSource::Remote`]
    /// - `file://` URLs become [`ImageSource::Local`]
    /// - everything else, other schemes and malformed URLs included, is taken
    ///   as a literal path (with `~` expanded), even when nothing exists
    ///   there; the loader reports that as not found
    pub fn resolve(input: &str) -> Result<Self, ExtractError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ExtractError::InvalidInput(
                "no image URL or file path given".to_string(),
            ));
        }

        if let Ok(url) = Url::parse(input) {
            match url.scheme() {
                "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => {
                    return Ok(ImageSource::Remote(url));
                }
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Ok(ImageSource::Local(path));
                    }
                }
                _ => {}
            }
        }

        let expanded = shellexpand::tilde(input);
        Ok(ImageSource::Local(PathBuf::from(expanded.as_ref())))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageSource::Remote(_))
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Local(path) => write!(f, "{}", path.display()),
            ImageSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_http_and_https() {
        let src = ImageSource::resolve("https://example.com/noise.jpg").unwrap();
        assert!(src.is_remote());
        assert_eq!(src.to_string(), "https://example.com/noise.jpg");

        let src = ImageSource::resolve("  http://example.com/a.png\n").unwrap();
        assert!(matches!(src, ImageSource::Remote(ref u) if u.host_str() == Some("example.com")));
    }

    #[test]
    fn test_resolve_local_path() {
        let src = ImageSource::resolve("/tmp/card.png").unwrap();
        assert_eq!(src, ImageSource::Local(PathBuf::from("/tmp/card.png")));
    }

    #[test]
    fn test_resolve_bare_word_is_local() {
        // Neither a URL nor an existing file: still a path lookup, not rejected.
        let src = ImageSource::resolve("not-a-path-or-url").unwrap();
        assert_eq!(src, ImageSource::Local(PathBuf::from("not-a-path-or-url")));
    }

    #[test]
    fn test_resolve_empty_is_invalid() {
        assert!(matches!(
            ImageSource::resolve(""),
            Err(ExtractError::InvalidInput(_))
        ));
        assert!(matches!(
            ImageSource::resolve("   \t "),
            Err(ExtractError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_other_schemes_are_local() {
        for input in ["ftp://example.com/a.png", "C://scans/card.png"] {
            assert_eq!(
                ImageSource::resolve(input).unwrap(),
                ImageSource::Local(PathBuf::from(input)),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_resolve_malformed_http_is_local() {
        for input in ["http://", "http://exa mple.com/a.png"] {
            assert_eq!(
                ImageSource::resolve(input).unwrap(),
                ImageSource::Local(PathBuf::from(input)),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_resolve_file_url() {
        let src = ImageSource::resolve("file:///tmp/card.png").unwrap();
        assert_eq!(src, ImageSource::Local(PathBuf::from("/tmp/card.png")));
    }
}
