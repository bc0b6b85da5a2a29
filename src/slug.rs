use std::sync::LazyLock;

use regex_lite::Regex;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SlugError {
    #[error("empty string")]
    EmptyInput,
    #[error("slug is zero length")]
    EmptyResult,
}

static NON_SLUG_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[^a-z\d]+").unwrap()
});

/// Derives a URL-safe slug from free text.
///
/// The input is lowercased, every run of characters outside `[a-z0-9]` is
/// collapsed into a single `-`, and hyphens are trimmed from both ends:
///
/// ```text
/// "Hello My Dear!!"        -> "hello-my-dear"
/// "Hello Baby! こんにちは" -> "hello-baby"
/// ```
///
/// Characters outside the ASCII range never survive, so text written only in
/// other scripts yields [`SlugError::EmptyResult`].
pub fn slugify(s: &str) -> Result<String, SlugError> {
    if s.is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let lowered = s.to_lowercase();
    let slug = NON_SLUG_RUN_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        return Err(SlugError::EmptyResult);
    }

    Ok(slug.to_string())
}
