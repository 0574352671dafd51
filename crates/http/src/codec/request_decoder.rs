//! HTTP request decoder module
//!
//! This module provides the resumable request parser. It consumes bytes from a connection's input
//! buffer across any number of calls and fills a [`Request`] stage by stage.
//!
//! # Components
//!
//! - [`RequestDecoder`]: Main decoder that drives the request through its [`RequestStatus`] stages
//! - Request line: Parsed by [`parse_request_line`](super::parse_request_line)
//! - Header parsing: Uses [`HeaderDecoder`] for line framing and header splitting
//! - Payload handling: Uses [`PayloadDecoder`] for pulling the request body if any
//!
//! # Example
//!
//! ```
//! use micro_evhttp::codec::RequestDecoder;
//! use micro_evhttp::protocol::RequestStatus;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::default();
//! let mut buffer = BytesMut::from(&b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n"[..]);
//!
//! while let Some(status) = decoder.decode(&mut buffer).unwrap() {
//!     if status.is_terminal() {
//!         break;
//!     }
//! }
//!
//! assert_eq!(decoder.request().status(), RequestStatus::Done);
//! assert_eq!(decoder.request().header("host"), Some("example.com"));
//! ```

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::body::PayloadDecoder;
use crate::codec::header::{HeaderDecoder, HeaderField, parse_payload};
use crate::codec::request_line::parse_request_line;
use crate::config::SessionConfig;
use crate::ensure;
use crate::protocol::{ParseError, PayloadItem, Request, RequestStatus};

/// A decoder for HTTP requests that handles the request line, headers and payload
///
/// # State Machine
///
/// The stage is the status of the request being built:
/// - [`RequestStatus::Init`]: waiting for a complete request line
/// - [`RequestStatus::RequestLineDone`]: reading header lines until the empty line
/// - [`RequestStatus::HeaderDone`]: pulling body bytes through the payload decoder
/// - [`RequestStatus::Done`] and [`RequestStatus::Error`]: terminal, decoding is a no-op
///
/// Each call to [`decode`](Decoder::decode) performs at most one stage and returns the new status
/// when the stage completed, or `None` when it needs more input or the request is terminal.
#[derive(Debug)]
pub struct RequestDecoder {
    request: Request,
    config: SessionConfig,
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl RequestDecoder {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            request: Request::new(),
            header_decoder: HeaderDecoder::new(config.max_header_bytes()),
            payload_decoder: None,
            config,
        }
    }

    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    #[inline]
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns true if the request declared a chunked body.
    ///
    /// Chunked request bodies are not decoded: such a request stays at
    /// [`RequestStatus::HeaderDone`] and its body bytes stay in the input buffer.
    pub fn is_chunked_body(&self) -> bool {
        self.payload_decoder.as_ref().is_some_and(PayloadDecoder::is_chunked)
    }

    fn decode_request_line(&mut self, src: &mut BytesMut) -> Result<Option<RequestStatus>, ParseError> {
        let Some(line) = self.header_decoder.decode_line(src)? else {
            return Ok(None);
        };

        let request_line = parse_request_line(&line, &self.config)?;
        let domain = request_line.domain().map(str::to_string);

        if let Some(authority) = &request_line.authority {
            self.request.headers.insert("Host", authority.as_str());
        }

        let request = &mut self.request;
        request.method = request_line.method;
        request.uri = request_line.uri;
        request.version = request_line.version;
        request.path = request_line.path;
        request.query = request_line.query;
        request.host = request_line.authority;
        request.domain = domain;

        Ok(Some(RequestStatus::RequestLineDone))
    }

    fn decode_headers(&mut self, src: &mut BytesMut) -> Result<Option<RequestStatus>, ParseError> {
        while let Some(field) = self.header_decoder.decode(src)? {
            match field {
                HeaderField::Field { name, value } => {
                    let headers = &mut self.request.headers;
                    let max_num = self.config.max_header_num();
                    ensure!(headers.contains(&name) || headers.len() < max_num, ParseError::too_many_headers(max_num));
                    headers.insert(name, value);
                }
                HeaderField::End => {
                    let (content_length, payload_size) = parse_payload(&self.request.headers);
                    trace!(
                        content_length,
                        payload_size = ?payload_size,
                        headers = self.request.headers.len(),
                        "header section done"
                    );

                    self.request.content_length = content_length;
                    self.payload_decoder = Some(payload_size.into());
                    return Ok(Some(RequestStatus::HeaderDone));
                }
            }
        }

        Ok(None)
    }

    fn decode_body(&mut self, src: &mut BytesMut) -> Result<Option<RequestStatus>, ParseError> {
        let Some(payload_decoder) = &mut self.payload_decoder else {
            return Ok(Some(RequestStatus::Done));
        };

        while let Some(item) = payload_decoder.decode(src)? {
            match item {
                PayloadItem::Chunk(bytes) => {
                    self.request.body_received += bytes.len() as u64;
                    self.request.body.extend_from_slice(&bytes);
                }
                PayloadItem::Eof => {
                    self.payload_decoder.take();
                    return Ok(Some(RequestStatus::Done));
                }
            }
        }

        trace!(received = self.request.body_received, declared = self.request.content_length, "waiting for body");
        Ok(None)
    }
}

impl Decoder for RequestDecoder {
    type Item = RequestStatus;
    type Error = ParseError;

    /// Advances the request by one stage.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(status))`: the request advanced to `status`
    /// - `Ok(None)`: more data is needed, or the request is already terminal
    /// - `Err(_)`: the request is malformed; its status is now [`RequestStatus::Error`]
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let result = match self.request.status {
            RequestStatus::Init => self.decode_request_line(src),
            RequestStatus::RequestLineDone => self.decode_headers(src),
            RequestStatus::HeaderDone => self.decode_body(src),
            RequestStatus::Done | RequestStatus::Error => return Ok(None),
        };

        match result {
            Ok(Some(status)) => {
                debug!(from = ?self.request.status, to = ?status, "request status advanced");
                self.request.status = status;
                Ok(Some(status))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                debug!(status = ?self.request.status, cause = %e, "request parse failed");
                self.request.status = RequestStatus::Error;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn decode_all(decoder: &mut RequestDecoder, src: &mut BytesMut) -> Result<RequestStatus, ParseError> {
        while decoder.decode(src)?.is_some() {}
        Ok(decoder.request().status())
    }

    fn crlf(text: &str) -> BytesMut {
        BytesMut::from(text.replace('\n', "\r\n").as_bytes())
    }

    #[test]
    fn one_stage_per_call() {
        let mut buffer = crlf("GET /a//b/c/ HTTP/1.1\nHost: x\n\n");
        let mut decoder = RequestDecoder::default();

        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(RequestStatus::RequestLineDone));
        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(RequestStatus::HeaderDone));
        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(RequestStatus::Done));
        assert_eq!(decoder.decode(&mut buffer).unwrap(), None);

        let request = decoder.request();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/a/b/c");
        assert_eq!(request.query(), "");
        assert_eq!(request.header("Host"), Some("x"));
        assert_eq!(request.content_length(), -1);
        assert_eq!(request.body_received(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn absolute_uri_sets_host() {
        let mut buffer = crlf("GET http://example.com:81/foo?q=1 HTTP/1.1\n\n");
        let mut decoder = RequestDecoder::default();

        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::Done);
        let request = decoder.request();
        assert_eq!(request.header("host"), Some("example.com:81"));
        assert_eq!(request.host(), Some("example.com:81"));
        assert_eq!(request.domain(), Some("example.com"));
        assert_eq!(request.path(), "/foo");
        assert_eq!(request.uri(), "/foo?q=1");
        assert_eq!(request.query(), "q=1");
    }

    #[test]
    fn body_across_reads() {
        let mut buffer = crlf("POST /p HTTP/1.1\nContent-Length: 5\n\n");
        buffer.extend_from_slice(b"ab");
        let mut decoder = RequestDecoder::default();

        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::HeaderDone);
        assert_eq!(decoder.request().body_received(), 2);
        assert_eq!(decoder.request().content_length(), 5);

        buffer.extend_from_slice(b"cdeGET");
        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::Done);
        assert_eq!(decoder.request().body_received(), 5);
        assert_eq!(decoder.request_mut().take_content(0).as_deref(), Some(&b"abcde"[..]));
        // bytes past the declared body are left for the caller
        assert_eq!(&buffer[..], b"GET");
    }

    #[test]
    fn zero_content_length() {
        let mut buffer = crlf("POST /p HTTP/1.0\ncontent-length: 0\n\n");
        let mut decoder = RequestDecoder::default();

        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::Done);
        assert_eq!(decoder.request().content_length(), 0);
        assert_eq!(decoder.request().version_str(), "HTTP/1.0");
    }

    #[test]
    fn chunked_body_stays_header_done() {
        let mut buffer = crlf("POST /p HTTP/1.1\nTransfer-Encoding: chunked\n\n3\nabc\n0\n\n");
        let mut decoder = RequestDecoder::default();

        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::HeaderDone);
        assert!(decoder.is_chunked_body());
        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::HeaderDone);
        assert_eq!(&buffer[..], b"3\r\nabc\r\n0\r\n\r\n");
    }

    #[test]
    fn invalid_version_is_error() {
        let mut buffer = crlf("GET /x HTTP/2.0\n");
        let mut decoder = RequestDecoder::default();

        assert!(matches!(decoder.decode(&mut buffer), Err(ParseError::InvalidVersion(_))));
        assert_eq!(decoder.request().status(), RequestStatus::Error);
        assert_eq!(decoder.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn leading_empty_line_is_error() {
        let mut buffer = crlf("\nGET / HTTP/1.1\n\n");
        let mut decoder = RequestDecoder::default();

        assert!(matches!(decoder.decode(&mut buffer), Err(ParseError::MalformedRequestLine { .. })));
    }

    #[test]
    fn duplicate_headers_overwrite() {
        let mut buffer = crlf("GET / HTTP/1.1\nX-A: 1\nx-a: 2\nNoColon\n\n");
        let mut decoder = RequestDecoder::default();

        assert_eq!(decode_all(&mut decoder, &mut buffer).unwrap(), RequestStatus::Done);
        let headers = decoder.request().headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X-A"), Some("2"));
        assert_eq!(headers.get("nocolon"), Some(""));
    }

    #[test]
    fn too_many_headers() {
        let config = SessionConfig::default().with_max_header_num(2);
        let mut buffer = crlf("GET / HTTP/1.1\nA: 1\nB: 2\nA: 3\nC: 4\n\n");
        let mut decoder = RequestDecoder::new(config);

        assert!(matches!(decode_all(&mut decoder, &mut buffer), Err(ParseError::TooManyHeaders { max_num: 2 })));
        assert_eq!(decoder.request().status(), RequestStatus::Error);
    }

    #[test]
    fn too_large_header() {
        let config = SessionConfig::default().with_max_header_bytes(32);
        let mut buffer = crlf("GET / HTTP/1.1\nX-Padding: aaaaaaaaaaaaaaaaaaaa\n\n");
        let mut decoder = RequestDecoder::new(config);

        assert!(matches!(decode_all(&mut decoder, &mut buffer), Err(ParseError::TooLargeHeader { .. })));
    }

    #[test]
    fn byte_at_a_time() {
        let input = crlf(indoc! {"
            POST http://example.com/up%20load?x=1 HTTP/1.0
            Content-Type: text/plain
            Content-Length: 11

            hello world"});

        let mut whole = RequestDecoder::default();
        let mut buffer = input.clone();
        decode_all(&mut whole, &mut buffer).unwrap();

        let mut pieces = RequestDecoder::default();
        let mut buffer = BytesMut::new();
        for byte in input.iter() {
            buffer.extend_from_slice(&[*byte]);
            decode_all(&mut pieces, &mut buffer).unwrap();
        }

        let (a, b) = (whole.request(), pieces.request());
        assert_eq!(b.status(), RequestStatus::Done);
        assert_eq!(a.status(), b.status());
        assert_eq!(a.method(), b.method());
        assert_eq!(a.uri(), b.uri());
        assert_eq!(a.path(), "/up load");
        assert_eq!(a.path(), b.path());
        assert_eq!(a.query(), b.query());
        assert_eq!(a.version(), b.version());
        assert_eq!(a.headers().iter().collect::<Vec<_>>(), b.headers().iter().collect::<Vec<_>>());
        assert_eq!(a.body_received(), b.body_received());
        assert_eq!(pieces.request_mut().take_content(0).as_deref(), Some(&b"hello world"[..]));
    }
}
