//! HTTP header decoder implementation for parsing the head of a request
//!
//! The head of a request is a sequence of CRLF terminated lines: the request line, the header
//! fields and an empty line. [`HeaderDecoder`] hands these out one line at a time, so it can be
//! driven by arbitrarily fragmented input and resumes exactly where it stopped.
//!
//! # Leniency
//!
//! Header fields are split at the first `:` and both sides are trimmed. A line without a colon is
//! kept as a header with an empty value instead of failing the request.
//!
//! # Limits
//!
//! The whole head (request line included) is limited to `max_header_bytes`, checked both for
//! complete lines and for a pending line that has not seen its CRLF yet.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{HeaderMap, ParseError, PayloadSize};

const CRLF: &[u8] = b"\r\n";

/// A single header section item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderField {
    /// A `name: value` line, both sides trimmed
    Field { name: String, value: String },
    /// The empty line terminating the header section
    End,
}

/// Line oriented decoder for the request head.
#[derive(Debug, Clone)]
pub struct HeaderDecoder {
    max_header_bytes: usize,
    consumed: usize,
}

impl HeaderDecoder {
    pub fn new(max_header_bytes: usize) -> Self {
        Self { max_header_bytes, consumed: 0 }
    }

    /// Bytes of the head consumed so far, line terminators included.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Takes the next CRLF terminated line out of `src`, without its terminator.
    ///
    /// Returns `Ok(None)` if `src` does not hold a complete line yet. A bare `\n` does not end a
    /// line.
    pub fn decode_line(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, ParseError> {
        let Some(pos) = src.windows(CRLF.len()).position(|window| window == CRLF) else {
            let pending = self.consumed + src.len();
            ensure!(pending <= self.max_header_bytes, ParseError::too_large_header(pending, self.max_header_bytes));
            return Ok(None);
        };

        let line_size = pos + CRLF.len();
        self.consumed += line_size;
        ensure!(
            self.consumed <= self.max_header_bytes,
            ParseError::too_large_header(self.consumed, self.max_header_bytes)
        );

        let mut line = src.split_to(line_size);
        line.truncate(pos);
        Ok(Some(line))
    }
}

impl Decoder for HeaderDecoder {
    type Item = HeaderField;
    type Error = ParseError;

    /// Decodes the next header field.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(HeaderField::Field { .. }))` for a header line
    /// - `Ok(Some(HeaderField::End))` for the empty line ending the section
    /// - `Ok(None)` if more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(line) = self.decode_line(src)? else {
            return Ok(None);
        };

        if line.is_empty() {
            return Ok(Some(HeaderField::End));
        }

        let (name, value) = split_field(&line);
        trace!(name = %name, value = %value, "parsed header field");
        Ok(Some(HeaderField::Field { name, value }))
    }
}

/// Splits a header line at the first `:`; a line without one becomes a name with an empty value.
fn split_field(line: &[u8]) -> (String, String) {
    let line = String::from_utf8_lossy(line);
    match line.split_once(':') {
        Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}

/// Determines how the request body is framed once all headers are known.
///
/// Returns the declared content length (`-1` if there is none) together with the payload size
/// the body decoder should use.
pub fn parse_payload(headers: &HeaderMap) -> (i64, PayloadSize) {
    let content_length = headers.get(http::header::CONTENT_LENGTH.as_str()).map_or(-1, parse_content_length);

    let payload_size = match content_length {
        0 => PayloadSize::Empty,
        n if n > 0 => PayloadSize::Length(n.unsigned_abs()),
        _ if is_chunked(headers.get(http::header::TRANSFER_ENCODING.as_str())) => PayloadSize::Chunked,
        _ => PayloadSize::Empty,
    };

    (content_length, payload_size)
}

/// Parses a `Content-Length` value the lenient way: surrounding whitespace, an optional sign and
/// the leading run of digits; anything after the digits is ignored and no digits at all means
/// `0`. Negative values mean the length is unknown and map to `-1`.
fn parse_content_length(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let length = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| acc.saturating_mul(10).saturating_add(i64::from(digit - b'0')));

    if negative && length > 0 { -1 } else { length }
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&str>) -> bool {
    const CHUNKED: &str = "chunked";
    if let Some(value) = header_value {
        if let Some(last) = value.rsplit(',').next() {
            return last.trim().eq_ignore_ascii_case(CHUNKED);
        }
    }
    false
}
