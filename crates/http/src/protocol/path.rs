//! Request path validation and canonicalization.
//!
//! Both functions operate on an already URL-decoded path. Validation only applies defensive
//! bounds (length, forbidden characters, segment length), it does not resolve `..` segments;
//! that is left to whatever serves files from the path.

use crate::config::SessionConfig;
use crate::ensure;
use crate::protocol::ParseError;

/// Characters that are never accepted in a request path.
const FORBIDDEN_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

/// Checks a decoded request path against the limits in `config`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidPath`] if the path:
/// - is empty, or at least `max_path_len` bytes long
/// - does not start with `/`
/// - contains one of `\ : * ? " < > |`
/// - has a segment of at least `max_segment_len` bytes
pub fn validate_path(path: &str, config: &SessionConfig) -> Result<(), ParseError> {
    ensure!(!path.is_empty(), ParseError::invalid_path("empty path"));
    ensure!(
        path.len() < config.max_path_len(),
        ParseError::invalid_path(format!("path length {} exceed the limit {}", path.len(), config.max_path_len()))
    );
    ensure!(path.starts_with('/'), ParseError::invalid_path("path must start with '/'"));

    if let Some(c) = path.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(ParseError::invalid_path(format!("forbidden character {c:?}")));
    }

    if let Some(segment) = path.split('/').find(|segment| segment.len() >= config.max_segment_len()) {
        return Err(ParseError::invalid_path(format!(
            "segment length {} exceed the limit {}",
            segment.len(),
            config.max_segment_len()
        )));
    }

    Ok(())
}

/// Normalizes a validated path: trims surrounding whitespace, collapses repeated slashes and
/// drops a single trailing slash. The root path `/` is kept as is.
pub fn canonicalize_path(path: &str) -> String {
    let trimmed = path.trim();

    let mut canonical = String::with_capacity(trimmed.len());
    let mut last_slash = false;
    for c in trimmed.chars() {
        if c == '/' {
            if last_slash {
                continue;
            }
            last_slash = true;
        } else {
            last_slash = false;
        }
        canonical.push(c);
    }

    if canonical.len() > 1 && canonical.ends_with('/') {
        canonical.pop();
    }
    canonical
}
