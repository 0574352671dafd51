//! HTTP response builder.
//!
//! A [`Response`] collects a status, headers and the body framing mode, then serializes itself
//! into its own outbound buffer. The header section is written exactly once: the first send call
//! freezes the header, and every later attempt to change the status, headers or content framing
//! is rejected with [`SendError::HeaderFrozen`].
//!
//! The body is framed in one of two modes:
//!
//! - fixed length, selected by [`Response::set_content`] with a non zero size; bodies go through
//!   [`Response::send_body`] and may never exceed the declared size
//! - chunked, the initial mode; bodies go through [`Response::send_chunk`] and an empty chunk
//!   writes the terminating `0\r\n\r\n`
//!
//! All misuse errors leave the outbound buffer untouched.
//!
//! # Example
//!
//! ```
//! use micro_evhttp::protocol::Response;
//!
//! let mut response = Response::new();
//! response.set_content(Some("text/plain"), 5).unwrap();
//! response.send_body(&b"hello"[..]).unwrap();
//!
//! assert_eq!(
//!     &response.take_outbound()[..],
//!     b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
//! );
//! ```

use bytes::{Buf, BytesMut};
use http::Version;
use tokio_util::codec::Encoder;
use tracing::{trace, warn};

use crate::codec::{HeaderEncoder, PayloadEncoder, ResponseHead};
use crate::protocol::{HeaderMap, SendError, known_reason, reason_phrase, UNKNOWN_REASON};

const CONTENT_TYPE: &str = "Content-Type";
const CONTENT_LENGTH: &str = "Content-Length";
const TRANSFER_ENCODING: &str = "Transfer-Encoding";
const CHUNKED: &str = "chunked";

#[derive(Debug)]
pub struct Response {
    version: Version,
    status_code: u16,
    reason: Option<String>,
    headers: HeaderMap,
    header_frozen: bool,
    header_encoder: HeaderEncoder,
    payload_encoder: PayloadEncoder,
    outbound: BytesMut,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            version: Version::HTTP_11,
            status_code: 200,
            reason: None,
            headers: HeaderMap::new(),
            header_frozen: false,
            header_encoder: HeaderEncoder,
            payload_encoder: PayloadEncoder::chunked(),
            outbound: BytesMut::new(),
        }
    }

    /// The version written into the status line.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The reason that will be (or was) written into the status line.
    pub fn reason(&self) -> &str {
        match &self.reason {
            Some(reason) => reason,
            None => known_reason(self.status_code).unwrap_or(UNKNOWN_REASON),
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    #[inline]
    pub fn is_header_frozen(&self) -> bool {
        self.header_frozen
    }

    /// The declared body length, or `-1` in chunked mode.
    pub fn content_length(&self) -> i64 {
        self.payload_encoder.content_length()
    }

    /// Body bytes written so far.
    ///
    /// Fixed length bodies count payload bytes, chunked bodies count the framed bytes including
    /// chunk sizes and line breaks.
    pub fn body_sent(&self) -> u64 {
        self.payload_encoder.sent()
    }

    /// Returns true once the declared length was sent, or the terminating chunk was written.
    pub fn is_finish(&self) -> bool {
        self.payload_encoder.is_finish()
    }

    pub fn outbound_mut(&mut self) -> &mut BytesMut {
        &mut self.outbound
    }

    /// Removes and returns every serialized byte not yet taken.
    pub fn take_outbound(&mut self) -> BytesMut {
        self.outbound.split()
    }

    pub fn set_version(&mut self, version: Version) -> Result<(), SendError> {
        self.ensure_not_frozen()?;
        self.version = version;
        Ok(())
    }

    /// Sets the status code and, when given, a custom reason.
    ///
    /// A custom reason set earlier is kept when `reason` is `None`; without any the reason comes
    /// from the status table when the header is sent.
    pub fn set_status(&mut self, code: impl Into<u16>, reason: Option<&str>) -> Result<(), SendError> {
        self.ensure_not_frozen()?;
        self.status_code = code.into();
        if let Some(reason) = reason {
            self.reason = Some(reason.to_string());
        }
        Ok(())
    }

    /// Sets a header, or removes it when `value` is `None`.
    pub fn set_header(&mut self, name: &str, value: Option<&str>) -> Result<(), SendError> {
        self.ensure_not_frozen()?;
        match value {
            Some(value) => {
                self.headers.insert(name, value);
            }
            None => {
                self.headers.remove(name);
            }
        }
        Ok(())
    }

    /// Declares the body.
    ///
    /// A non zero `size` selects fixed length mode with `Content-Type` (defaulting to
    /// `application/octet-stream`) and `Content-Length`. A zero size with a content type selects
    /// chunked mode. A zero size without a content type changes nothing. Selecting a mode drops the
    /// framing header of the other one.
    pub fn set_content(&mut self, content_type: Option<&str>, size: u64) -> Result<(), SendError> {
        self.ensure_not_frozen()?;

        if size > 0 {
            let content_type = content_type.unwrap_or(mime::APPLICATION_OCTET_STREAM.essence_str());
            self.headers.insert(CONTENT_TYPE, content_type);
            self.headers.insert(CONTENT_LENGTH, size.to_string());
            self.headers.remove(TRANSFER_ENCODING);
            self.payload_encoder = PayloadEncoder::fix_length(size);
        } else if content_type.is_some() {
            self.headers.remove(CONTENT_LENGTH);
            self.headers.insert(TRANSFER_ENCODING, CHUNKED);
            self.payload_encoder = PayloadEncoder::chunked();
        }
        Ok(())
    }

    /// Freezes the header and writes the status line and headers.
    ///
    /// Returns the number of bytes appended to the outbound buffer.
    pub fn send_header(&mut self) -> Result<usize, SendError> {
        self.ensure_not_frozen()?;
        self.header_frozen = true;

        let reason = match &self.reason {
            Some(reason) => reason.as_str(),
            None => reason_phrase(self.status_code),
        };
        let head = ResponseHead { version: self.version, code: self.status_code, reason, headers: &self.headers };

        let before = self.outbound.len();
        self.header_encoder.encode(head, &mut self.outbound)?;
        let written = self.outbound.len() - before;

        trace!(code = self.status_code, written, "response header sent");
        Ok(written)
    }

    /// Writes part of a fixed length body, sending the header first if needed.
    ///
    /// Returns the number of bytes appended by this call, header included.
    pub fn send_body<D: Buf>(&mut self, data: D) -> Result<usize, SendError> {
        self.payload_encoder.check_fixed(data.remaining())?;

        let before = self.outbound.len();
        if !self.header_frozen {
            self.send_header()?;
        }
        self.payload_encoder.encode(data, &mut self.outbound)?;
        Ok(self.outbound.len() - before)
    }

    /// Writes one chunk of a chunked body, sending the header first if needed. An empty `data`
    /// writes the terminating chunk.
    ///
    /// Returns the number of framed bytes appended, header excluded.
    pub fn send_chunk<D: Buf>(&mut self, data: D) -> Result<usize, SendError> {
        self.payload_encoder.check_chunked()?;

        if !self.header_frozen {
            self.send_header()?;
        }
        let before = self.outbound.len();
        self.payload_encoder.encode(data, &mut self.outbound)?;
        Ok(self.outbound.len() - before)
    }

    /// Sends a complete response in one call: status with its table reason, content headers,
    /// header and body.
    ///
    /// Empty `data` sends `Content-Length: 0` and the header only. Returns the number of bytes
    /// appended.
    pub fn send<D: Buf>(
        &mut self,
        code: impl Into<u16>,
        content_type: Option<&str>,
        data: D,
    ) -> Result<usize, SendError> {
        self.ensure_not_frozen()?;
        self.status_code = code.into();
        self.reason = None;

        let size = data.remaining();
        if size > 0 {
            self.set_content(content_type, size as u64)?;
            return self.send_body(data);
        }

        if let Some(content_type) = content_type {
            self.headers.insert(CONTENT_TYPE, content_type);
        }
        self.headers.remove(TRANSFER_ENCODING);
        self.headers.insert(CONTENT_LENGTH, "0");
        self.payload_encoder = PayloadEncoder::fix_length(0);
        self.send_header()
    }

    fn ensure_not_frozen(&self) -> Result<(), SendError> {
        if self.header_frozen {
            warn!(code = self.status_code, "response header already sent");
            return Err(SendError::HeaderFrozen);
        }
        Ok(())
    }
}
