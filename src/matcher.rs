//! Email address matching over recognized text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::ocr::RecognizedText;

/// `local-part@domain.tld`: local part of letters, digits and `._%+-`;
/// dot-separated alphanumeric domain labels with internal hyphens; a
/// top-level domain of two or more letters.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}\b").unwrap()
});

/// Extract unique email-shaped substrings from `text`.
///
/// Duplicates are detected case-insensitively; the first occurrence wins,
/// both for ordering and for the casing that is returned.
pub fn extract(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    collect(text, &mut seen, &mut emails);
    emails
}

/// Extract emails page by page, merging in page order.
///
/// Each page is scanned on its own, so an address is never stitched
/// together across a page break.
pub fn extract_pages(text: &RecognizedText) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    for page in text.pages() {
        collect(page, &mut seen, &mut emails);
    }
    emails
}

fn collect(text: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    for m in EMAIL_PATTERN.find_iter(text) {
        let email = m.as_str();
        if seen.insert(email.to_lowercase()) {
            out.push(email.to_string());
        }
    }
}
