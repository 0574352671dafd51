//! Per-connection protocol driver.
//!
//! A [`Session`] binds one request parser and one response builder to a connection. The
//! connection manager owns it for the lifetime of the connection and forwards its events:
//!
//! - [`Session::on_init`] when the connection is accepted
//! - [`Session::on_read`] whenever new bytes were appended to the connection's input buffer
//! - [`Session::on_write`] after outbound bytes were flushed
//! - [`Session::on_close`] when the connection goes away, which releases the session
//!
//! `on_read` answers with a [`Signal`]: [`Signal::Proceed`] only once the request is fully
//! parsed, so application code never sees a half-parsed request, [`Signal::Suspend`] while more
//! input is needed and [`Signal::Fatal`] when the request is malformed and the connection must be
//! closed without a response.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_evhttp::config::SessionConfig;
//! use micro_evhttp::session::{CloseReason, Session, Signal};
//!
//! let mut session = Session::on_init(SessionConfig::default());
//! let mut input = BytesMut::from(&b"GET /hello HTTP/1.1\r\n"[..]);
//! assert_eq!(session.on_read(&mut input), Signal::Suspend);
//!
//! input.extend_from_slice(b"\r\n");
//! assert_eq!(session.on_read(&mut input), Signal::Proceed);
//! assert_eq!(session.request().path(), "/hello");
//!
//! session.response_mut().send(200u16, Some("text/plain"), &b"hi"[..]).unwrap();
//! let outbound = session.take_outbound();
//! assert!(outbound.starts_with(b"HTTP/1.1 200 OK\r\n"));
//!
//! session.on_close(CloseReason::Shutdown);
//! ```

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::RequestDecoder;
use crate::config::SessionConfig;
use crate::protocol::{ParseError, Request, RequestStatus, Response};

/// What the connection manager should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Wait for more input
    Suspend,
    /// The request is complete and can be handled
    Proceed,
    /// The request is malformed, close the connection
    Fatal,
}

/// Why a connection was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The connection was idle for too long
    Timeout,
    /// The exchange finished, or the server is shutting down
    Shutdown,
    /// The peer went away or the transport failed
    Other,
}

#[derive(Debug)]
pub struct Session {
    decoder: RequestDecoder,
    response: Response,
    error: Option<ParseError>,
}

impl Default for Session {
    fn default() -> Self {
        Self::on_init(SessionConfig::default())
    }
}

impl Session {
    /// Creates the session for a newly accepted connection.
    pub fn on_init(config: SessionConfig) -> Self {
        trace!(config = ?config, "session created");
        Self { decoder: RequestDecoder::new(config), response: Response::new(), error: None }
    }

    /// Advances the request with whatever `input` holds.
    ///
    /// Consumed bytes are removed from `input`; bytes past the end of the request, and body bytes
    /// of a chunked request, are left in place.
    pub fn on_read(&mut self, input: &mut BytesMut) -> Signal {
        loop {
            match self.decoder.decode(input) {
                Ok(Some(RequestStatus::RequestLineDone)) => {
                    let version = self.decoder.request().version();
                    if let Err(e) = self.response.set_version(version) {
                        debug!(cause = %e, "response version not updated");
                    }
                }
                Ok(Some(RequestStatus::Done)) | Ok(None) => break,
                Ok(Some(_)) => {}
                Err(e) => {
                    debug!(cause = %e, "request is malformed, session is fatal");
                    self.error = Some(e);
                    break;
                }
            }
        }

        match self.status() {
            RequestStatus::Done => Signal::Proceed,
            RequestStatus::Error => Signal::Fatal,
            _ => Signal::Suspend,
        }
    }

    /// Called after outbound bytes were flushed.
    pub fn on_write(&mut self) -> Signal {
        trace!(pending = self.response.outbound_mut().len(), "session write");
        Signal::Proceed
    }

    /// Releases the session.
    pub fn on_close(self, reason: CloseReason) {
        debug!(reason = ?reason, status = ?self.status(), "session closed");
    }

    #[inline]
    pub fn status(&self) -> RequestStatus {
        self.decoder.request().status()
    }

    /// The parse error that made this session fatal.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    /// Returns true if the request declared a chunked body, which is not decoded.
    pub fn is_chunked_body(&self) -> bool {
        self.decoder.is_chunked_body()
    }

    pub fn config(&self) -> &SessionConfig {
        self.decoder.config()
    }

    pub fn request(&self) -> &Request {
        self.decoder.request()
    }

    pub fn request_mut(&mut self) -> &mut Request {
        self.decoder.request_mut()
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn outbound_mut(&mut self) -> &mut BytesMut {
        self.response.outbound_mut()
    }

    pub fn take_outbound(&mut self) -> BytesMut {
        self.response.take_outbound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Version;
    use indoc::indoc;

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    fn feed(session: &mut Session, input: &mut BytesMut, bytes: &[u8]) -> Signal {
        input.extend_from_slice(bytes);
        session.on_read(input)
    }

    #[test]
    fn simple_get() {
        let mut session = Session::default();
        let mut input = BytesMut::new();

        assert_eq!(feed(&mut session, &mut input, b"GET /a//b/c/ HTTP/1.1\r\nHost: x\r\n\r\n"), Signal::Proceed);

        let request = session.request();
        assert_eq!(request.path(), "/a/b/c");
        assert_eq!(request.query(), "");
        assert_eq!(request.header("host"), Some("x"));
        assert_eq!(request.body_received(), 0);
        assert_eq!(session.status(), RequestStatus::Done);

        // further reads after done keep proceeding
        assert_eq!(feed(&mut session, &mut input, b""), Signal::Proceed);
    }

    #[test]
    fn absolute_uri() {
        let mut session = Session::default();
        let mut input = BytesMut::new();

        assert_eq!(feed(&mut session, &mut input, b"GET http://example.com/foo HTTP/1.1\r\n\r\n"), Signal::Proceed);
        assert_eq!(session.request().header("Host"), Some("example.com"));
        assert_eq!(session.request().path(), "/foo");

        let mut session = Session::default();
        let mut input = BytesMut::new();

        assert_eq!(feed(&mut session, &mut input, b"GET http://example.com HTTP/1.1\r\n\r\n"), Signal::Proceed);
        assert_eq!(session.request().header("Host"), Some("example.com"));
        assert_eq!(session.request().path(), "/");
    }

    #[test]
    fn unsupported_version_is_fatal() {
        let mut session = Session::default();
        let mut input = BytesMut::new();

        assert_eq!(feed(&mut session, &mut input, b"GET /x HTTP/2.0\r\n"), Signal::Fatal);
        assert!(matches!(session.error(), Some(ParseError::InvalidVersion(_))));
        assert_eq!(feed(&mut session, &mut input, b"Host: x\r\n\r\n"), Signal::Fatal);
        assert!(session.take_error().is_some());
    }

    #[test]
    fn forbidden_path_is_fatal() {
        for path in ["/a\\b", "/c:", "/a*", "/a%3F", "/a%22", "/a%3C", "/a%3E", "/a|b"] {
            let mut session = Session::default();
            let mut input = BytesMut::new();
            let line = format!("GET {path} HTTP/1.1\r\n\r\n");

            assert_eq!(feed(&mut session, &mut input, line.as_bytes()), Signal::Fatal, "path {path}");
            assert!(matches!(session.error(), Some(ParseError::InvalidPath { .. })));
        }
    }

    #[test]
    fn body_in_two_reads() {
        let mut session = Session::default();
        let mut input = BytesMut::new();

        let signal = feed(&mut session, &mut input, b"POST /p HTTP/1.1\r\nContent-Length: 5\r\n\r\nab");
        assert_eq!(signal, Signal::Suspend);
        assert_eq!(session.status(), RequestStatus::HeaderDone);
        assert_eq!(session.request().body_received(), 2);

        assert_eq!(feed(&mut session, &mut input, b"cde"), Signal::Proceed);
        assert_eq!(session.request().body_received(), 5);
        assert_eq!(session.request().content_length(), 5);
        assert_eq!(session.request_mut().take_content(0).as_deref(), Some(&b"abcde"[..]));
        assert_eq!(session.request_mut().take_content(0), None);
    }

    #[test]
    fn chunked_request_suspends() {
        let mut session = Session::default();
        let mut input = BytesMut::new();

        let request = b"POST /p HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n";
        let signal = feed(&mut session, &mut input, request);
        assert_eq!(signal, Signal::Suspend);
        assert!(session.is_chunked_body());
        assert_eq!(session.status(), RequestStatus::HeaderDone);
        assert_eq!(&input[..], b"3\r\nabc\r\n");
    }

    #[test]
    fn response_echoes_request_version() {
        let mut session = Session::default();
        let mut input = BytesMut::new();

        assert_eq!(feed(&mut session, &mut input, b"GET / HTTP/1.0\r\n\r\n"), Signal::Proceed);
        assert_eq!(session.response().version(), Version::HTTP_10);

        session.response_mut().send(200u16, Some("text/plain"), &b"ok"[..]).unwrap();
        assert_eq!(
            &session.take_outbound()[..],
            b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nok"
        );
        assert_eq!(session.on_write(), Signal::Proceed);
        session.on_close(CloseReason::Shutdown);
    }

    #[test]
    fn byte_at_a_time_matches_one_shot() {
        let input = crlf(indoc! {"
            PUT http://example.com:8080/docs/a%20b/?lang=en HTTP/1.1
            User-Agent: test
            X-Empty:
            content-length: 9

            some body"});

        let mut whole = Session::default();
        let mut buffer = BytesMut::from(&input[..]);
        assert_eq!(whole.on_read(&mut buffer), Signal::Proceed);

        let mut pieces = Session::default();
        let mut buffer = BytesMut::new();
        let mut signals = Vec::new();
        for byte in &input {
            signals.push(feed(&mut pieces, &mut buffer, &[*byte]));
        }

        assert_eq!(signals.last(), Some(&Signal::Proceed));
        assert!(signals[..signals.len() - 1].iter().all(|signal| *signal == Signal::Suspend));

        let (a, b) = (whole.request(), pieces.request());
        assert_eq!(a.method(), "PUT");
        assert_eq!(a.method(), b.method());
        assert_eq!(a.uri(), b.uri());
        assert_eq!(a.path(), "/docs/a b");
        assert_eq!(a.path(), b.path());
        assert_eq!(a.query(), b.query());
        assert_eq!(a.host(), b.host());
        assert_eq!(a.domain(), Some("example.com"));
        assert_eq!(a.domain(), b.domain());
        assert_eq!(a.headers().iter().collect::<Vec<_>>(), b.headers().iter().collect::<Vec<_>>());
        assert_eq!(a.content_length(), b.content_length());
        assert_eq!(whole.request_mut().take_content(0), pieces.request_mut().take_content(0));
    }
}
