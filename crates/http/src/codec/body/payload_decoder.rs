//! Decoder implementation for HTTP request payloads.
//!
//! Supports fixed length bodies and bodies-less requests. Chunked request bodies are recognized
//! but not decoded: the decoder never produces an item for them and leaves the bytes in the
//! source buffer, so a chunked request stays in the header-done stage.

use crate::codec::body::length_decoder::LengthDecoder;
use crate::protocol::{ParseError, PayloadItem, PayloadSize};
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::warn;

/// A unified decoder for handling HTTP request payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDecoder {
    /// The specific decoding strategy to use
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Decode payload with a fixed content length
    Length(LengthDecoder),

    /// Chunked transfer encoding, not decoded; `warned` records the one time warning
    Chunked { warned: bool },

    /// Handle messages with no body
    NoBody,
}

impl PayloadDecoder {
    /// Creates a PayloadDecoder for messages with no body.
    pub fn empty() -> Self {
        Self { kind: Kind::NoBody }
    }

    /// Creates a PayloadDecoder for chunked transfer encoding.
    pub fn chunked() -> Self {
        Self { kind: Kind::Chunked { warned: false } }
    }

    /// Creates a PayloadDecoder for a fixed-length payload.
    pub fn fix_length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthDecoder::new(size)) }
    }

    /// Returns whether this decoder handles chunked transfer encoding.
    pub fn is_chunked(&self) -> bool {
        matches!(&self.kind, Kind::Chunked { .. })
    }

    /// Returns whether this decoder handles messages with no body.
    pub fn is_empty(&self) -> bool {
        matches!(&self.kind, Kind::NoBody)
    }

    /// Returns whether this decoder handles fixed-length payloads.
    pub fn is_fix_length(&self) -> bool {
        matches!(&self.kind, Kind::Length(_))
    }
}

impl From<PayloadSize> for PayloadDecoder {
    fn from(payload_size: PayloadSize) -> Self {
        match payload_size {
            PayloadSize::Length(0) | PayloadSize::Empty => PayloadDecoder::empty(),
            PayloadSize::Length(n) => PayloadDecoder::fix_length(n),
            PayloadSize::Chunked => PayloadDecoder::chunked(),
        }
    }
}

impl Decoder for PayloadDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.decode(src),
            Kind::Chunked { warned } => {
                if !*warned {
                    *warned = true;
                    warn!(buffered = src.len(), "chunked request body is not supported, request stays at header done");
                }
                Ok(None)
            }
            Kind::NoBody => Ok(Some(PayloadItem::Eof)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_payload_size() {
        assert!(PayloadDecoder::from(PayloadSize::Empty).is_empty());
        assert!(PayloadDecoder::from(PayloadSize::Length(0)).is_empty());
        assert!(PayloadDecoder::from(PayloadSize::Length(3)).is_fix_length());
        assert!(PayloadDecoder::from(PayloadSize::Chunked).is_chunked());
    }

    #[test]
    fn chunked_leaves_bytes_untouched() {
        let mut buffer = BytesMut::from(&b"3\r\nabc\r\n0\r\n\r\n"[..]);
        let mut decoder = PayloadDecoder::chunked();

        assert_eq!(decoder.decode(&mut buffer).unwrap(), None);
        assert_eq!(decoder.decode(&mut buffer).unwrap(), None);
        assert_eq!(buffer.len(), 13);
    }

    #[test]
    fn no_body_is_eof() {
        let mut buffer = BytesMut::from(&b"GET"[..]);
        let mut decoder = PayloadDecoder::empty();

        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(PayloadItem::Eof));
        assert_eq!(&buffer[..], b"GET");
    }
}
