use crate::protocol::SendError;
use bytes::{Buf, BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;

/// Frames a body with chunked transfer encoding.
///
/// A non-empty item becomes `<HEX-LEN>\r\n<data>\r\n`, an empty item is the terminating
/// `0\r\n\r\n`. `sent` counts the framed bytes, not the payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedEncoder {
    eof: bool,
    sent: u64,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false, sent: 0 }
    }

    #[inline]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Returns true once the terminating chunk was written.
    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl Default for ChunkedEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Buf> Encoder<D> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: D, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let before = dst.len();

        let len = item.remaining();
        if len > 0 {
            write!(helper::Writer(dst), "{len:X}\r\n")?;
            dst.reserve(len + 2);
            dst.put(item);
            dst.put_slice(b"\r\n");
        } else {
            self.eof = true;
            dst.put_slice(b"0\r\n\r\n");
        }

        self.sent += (dst.len() - before) as u64;
        Ok(())
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_chunks() {
        let mut encoder = ChunkedEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(&b"abc"[..], &mut dst).unwrap();
        assert!(!encoder.is_finish());
        encoder.encode(&b""[..], &mut dst).unwrap();
        assert!(encoder.is_finish());

        assert_eq!(&dst[..], b"3\r\nabc\r\n0\r\n\r\n");
        assert_eq!(encoder.sent(), dst.len() as u64);
    }

    #[test]
    fn hex_length() {
        let mut encoder = ChunkedEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(&[b'x'; 26][..], &mut dst).unwrap();
        assert!(dst.starts_with(b"1A\r\n"));
        assert!(dst.ends_with(b"x\r\n"));
        assert_eq!(dst.len(), 4 + 26 + 2);
    }
}
