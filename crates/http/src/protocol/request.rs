//! Incrementally built HTTP request.
//!
//! A [`Request`] is filled strictly left to right by the [`RequestDecoder`](crate::codec::RequestDecoder):
//! request line first, then headers, then body bytes. Fields belonging to a later stage keep their
//! empty defaults until the decoder's [`RequestStatus`] reaches that stage.

use bytes::{Bytes, BytesMut};
use http::Version;

use crate::protocol::HeaderMap;

/// Progress of a request through the parser.
///
/// Variants are ordered: a request's status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestStatus {
    /// Waiting for the request line
    Init,
    /// Request line parsed, reading headers
    RequestLineDone,
    /// Headers parsed, reading body
    HeaderDone,
    /// Request fully parsed
    Done,
    /// Parsing failed, the connection must be closed
    Error,
}

impl RequestStatus {
    /// Returns true if no further parsing will happen in this status.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Done | RequestStatus::Error)
    }
}

/// A parsed (or partially parsed) HTTP request.
#[derive(Debug)]
pub struct Request {
    pub(crate) status: RequestStatus,
    pub(crate) method: String,
    pub(crate) uri: String,
    pub(crate) version: Version,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) host: Option<String>,
    pub(crate) domain: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) content_length: i64,
    pub(crate) body_received: u64,
    pub(crate) body: BytesMut,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            status: RequestStatus::Init,
            method: String::new(),
            uri: String::new(),
            version: Version::HTTP_11,
            path: String::new(),
            query: String::new(),
            host: None,
            domain: None,
            headers: HeaderMap::new(),
            content_length: -1,
            body_received: 0,
            body: BytesMut::new(),
        }
    }

    #[inline]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// The upper-cased request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request URI in origin form, including the query string.
    ///
    /// For absolute-form targets this is the part after the authority, or `/`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// The version as it appears on the wire, e.g. `HTTP/1.1`.
    pub fn version_str(&self) -> &'static str {
        version_as_str(self.version)
    }

    /// The URL-decoded, validated and canonicalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string without the leading `?`; empty if there is none.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The authority of an absolute-form target, e.g. `example.com:8080`.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The authority of an absolute-form target without its port.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Looks up a request header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared `Content-Length`, or `-1` when the request did not declare one.
    #[inline]
    pub fn content_length(&self) -> i64 {
        self.content_length
    }

    /// Number of body bytes pulled from the input so far.
    #[inline]
    pub fn body_received(&self) -> u64 {
        self.body_received
    }

    /// Removes up to `max_size` buffered body bytes (`0` means all of them).
    ///
    /// Returns `None` when no body bytes are buffered.
    pub fn take_content(&mut self, max_size: usize) -> Option<Bytes> {
        let available = self.body.len();
        let len = if max_size == 0 { available } else { available.min(max_size) };
        if len == 0 {
            return None;
        }
        Some(self.body.split_to(len).freeze())
    }

    /// Direct access to the buffered body bytes.
    pub fn body_mut(&mut self) -> &mut BytesMut {
        &mut self.body
    }
}

/// Maps a version to its request/status line spelling.
pub fn version_as_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}
