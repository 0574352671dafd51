//! HTTP header encoder implementation for serializing HTTP response headers
//!
//! Writes the status line, every header in the map's iteration order and the blank line that
//! terminates the header section. Framing headers (`Content-Length`, `Transfer-Encoding`) are
//! not added here, the response builder puts them into the map before encoding.

use crate::protocol::{HeaderMap, SendError, version_as_str};

use bytes::{BufMut, BytesMut};

use http::Version;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Borrowed view of everything that goes into a response header section.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHead<'a> {
    pub version: Version,
    pub code: u16,
    pub reason: &'a str,
    pub headers: &'a HeaderMap,
}

/// Encoder for HTTP response headers implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<ResponseHead<'_>> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ResponseHead<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        write!(FastWrite(dst), "{} {} {}\r\n", version_as_str(item.version), item.code, item.reason)?;

        for (name, value) in item.headers.iter() {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_status_line_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("Content-Length", "5");

        let head = ResponseHead { version: Version::HTTP_10, code: 200, reason: "OK", headers: &headers };
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(head, &mut dst).unwrap();

        assert_eq!(&dst[..], b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\n");
    }

    #[test]
    fn encode_without_headers() {
        let headers = HeaderMap::new();
        let head = ResponseHead { version: Version::HTTP_11, code: 299, reason: "-", headers: &headers };
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(head, &mut dst).unwrap();

        assert_eq!(&dst[..], b"HTTP/1.1 299 -\r\n\r\n");
    }
}
