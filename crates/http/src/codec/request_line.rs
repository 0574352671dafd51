//! Request line parsing.
//!
//! A request line is `METHOD SP target SP HTTP-VERSION`. Tokens are separated by spaces, with runs
//! of spaces counting as one separator. The target is either origin-form (`/path?query`) or
//! absolute-form (`scheme://authority/path?query`); for the latter the authority is reported
//! separately so it can become the `Host` header.

use std::borrow::Cow;

use http::Version;
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::config::SessionConfig;
use crate::protocol::{ParseError, canonicalize_path, validate_path};

const SCHEME_SEPARATOR: &str = "://";

/// The parts of a successfully parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    pub version: Version,
    pub path: String,
    pub query: String,
    pub authority: Option<String>,
}

impl RequestLine {
    /// The authority without its port, if the target was in absolute form.
    pub fn domain(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        // keep bracketed ipv6 literals intact
        let port_start = match authority.rfind(']') {
            Some(end) => authority[end..].find(':').map(|pos| end + pos),
            None => authority.rfind(':'),
        };
        Some(port_start.map_or(authority, |pos| &authority[..pos]))
    }
}

/// Parses a request line (without its CRLF).
///
/// # Errors
///
/// - [`ParseError::MalformedRequestLine`] for anything but exactly three tokens, or non UTF-8 input
/// - [`ParseError::InvalidVersion`] for versions other than HTTP/0.9, HTTP/1.0 and HTTP/1.1
/// - [`ParseError::InvalidTarget`] for targets in neither origin nor absolute form
/// - [`ParseError::InvalidPath`] if the decoded path fails validation
pub fn parse_request_line(line: &[u8], config: &SessionConfig) -> Result<RequestLine, ParseError> {
    let line = std::str::from_utf8(line).map_err(|e| ParseError::malformed_request_line(format!("not utf-8: {e}")))?;

    let mut tokens = line.split(' ').filter(|token| !token.is_empty());
    let (Some(method), Some(target), Some(version), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        debug!(line, "invalid request line");
        return Err(ParseError::malformed_request_line(line));
    };

    let method = method.to_ascii_uppercase();
    let version = parse_version(version)?;

    let (uri, authority) = split_target(target)?;

    let (raw_path, query) = match uri.split_once('?') {
        Some((path, query)) => (path, query.to_string()),
        None => (uri.as_str(), String::new()),
    };

    let decoded = url_decode(raw_path);
    validate_path(&decoded, config)?;
    let path = canonicalize_path(&decoded);

    debug!(method = %method, uri = %uri, version = ?version, "parsed request line");

    Ok(RequestLine { method, uri, version, path, query, authority })
}

fn parse_version(version: &str) -> Result<Version, ParseError> {
    match version.to_ascii_uppercase().as_str() {
        "HTTP/0.9" => Ok(Version::HTTP_09),
        "HTTP/1.0" => Ok(Version::HTTP_10),
        "HTTP/1.1" => Ok(Version::HTTP_11),
        _ => {
            debug!(version, "unknown protocol");
            Err(ParseError::invalid_version(version))
        }
    }
}

/// Splits a request target into the origin-form uri and, for absolute-form, the authority.
fn split_target(target: &str) -> Result<(String, Option<String>), ParseError> {
    if target.starts_with('/') {
        return Ok((target.to_string(), None));
    }

    let Some(scheme_end) = target.find(SCHEME_SEPARATOR) else {
        debug!(target, "invalid uri format");
        return Err(ParseError::invalid_target(target));
    };

    let rest = &target[scheme_end + SCHEME_SEPARATOR.len()..];
    match rest.find('/') {
        Some(path_start) => Ok((rest[path_start..].to_string(), Some(rest[..path_start].to_string()))),
        // no path, ex) http://domain.com:80
        None => Ok(("/".to_string(), Some(rest.to_string()))),
    }
}

/// Decodes `%XX` escapes and `+` as space.
fn url_decode(path: &str) -> Cow<'_, str> {
    if !path.contains(['%', '+']) {
        return Cow::Borrowed(path);
    }
    let plus_decoded = path.replace('+', " ");
    Cow::Owned(percent_decode_str(&plus_decoded).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<RequestLine, ParseError> {
        parse_request_line(line.as_bytes(), &SessionConfig::default())
    }

    #[test]
    fn origin_form() {
        let line = parse("get /index.html?a=1&b=%20 http/1.0").unwrap();

        assert_eq!(line.method, "GET");
        assert_eq!(line.version, Version::HTTP_10);
        assert_eq!(line.uri, "/index.html?a=1&b=%20");
        assert_eq!(line.path, "/index.html");
        assert_eq!(line.query, "a=1&b=%20");
        assert_eq!(line.authority, None);
        assert_eq!(line.domain(), None);
    }

    #[test]
    fn absolute_form() {
        let line = parse("GET http://example.com:8080/foo/?x HTTP/1.1").unwrap();

        assert_eq!(line.uri, "/foo/?x");
        assert_eq!(line.path, "/foo");
        assert_eq!(line.query, "x");
        assert_eq!(line.authority.as_deref(), Some("example.com:8080"));
        assert_eq!(line.domain(), Some("example.com"));
    }

    #[test]
    fn absolute_form_without_path() {
        let line = parse("GET http://example.com HTTP/1.1").unwrap();

        assert_eq!(line.uri, "/");
        assert_eq!(line.path, "/");
        assert_eq!(line.authority.as_deref(), Some("example.com"));
    }

    #[test]
    fn ipv6_domain() {
        let line = parse("GET http://[::1]:80/ HTTP/1.1").unwrap();
        assert_eq!(line.domain(), Some("[::1]"));

        let line = parse("GET http://[::1]/ HTTP/1.1").unwrap();
        assert_eq!(line.domain(), Some("[::1]"));
    }

    #[test]
    fn token_count() {
        assert!(matches!(parse("GET /"), Err(ParseError::MalformedRequestLine { .. })));
        assert!(matches!(parse("GET / HTTP/1.1 extra"), Err(ParseError::MalformedRequestLine { .. })));
        assert!(matches!(parse(""), Err(ParseError::MalformedRequestLine { .. })));
        assert!(parse("GET  /   HTTP/1.1").is_ok());
    }

    #[test]
    fn versions() {
        assert!(parse("GET / HTTP/0.9").is_ok());
        assert!(parse("GET / HTTP/1.1").is_ok());
        assert!(matches!(parse("GET /x HTTP/2.0"), Err(ParseError::InvalidVersion(_))));
        assert!(matches!(parse("GET /x FTP/1.0"), Err(ParseError::InvalidVersion(_))));
    }

    #[test]
    fn invalid_target() {
        assert!(matches!(parse("GET index.html HTTP/1.1"), Err(ParseError::InvalidTarget { .. })));
        assert!(matches!(parse("OPTIONS * HTTP/1.1"), Err(ParseError::InvalidTarget { .. })));
    }

    #[test]
    fn decoded_path_is_validated() {
        assert_eq!(parse("GET /a%20b/c+d HTTP/1.1").unwrap().path, "/a b/c d");
        assert!(matches!(parse("GET /a%3Fb HTTP/1.1"), Err(ParseError::InvalidPath { .. })));
        assert!(matches!(parse("GET /..%5Cevil HTTP/1.1"), Err(ParseError::InvalidPath { .. })));
        assert!(matches!(parse("GET /c:/windows HTTP/1.1"), Err(ParseError::InvalidPath { .. })));
    }

    #[test]
    fn invalid_utf8() {
        let result = parse_request_line(b"GET /\xff HTTP/1.1", &SessionConfig::default());
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));
    }
}
