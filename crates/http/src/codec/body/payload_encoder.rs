use crate::codec::body::chunked_encoder::ChunkedEncoder;
use crate::codec::body::length_encoder::LengthEncoder;
use crate::protocol::SendError;
use bytes::{Buf, BytesMut};

use tokio_util::codec::Encoder;
use tracing::warn;

/// encode payload for response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEncoder {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// content-length payload
    Length(LengthEncoder),

    /// transfer-encoding chunked payload
    Chunked(ChunkedEncoder),
}

impl PayloadEncoder {
    /// create a chunked `PayloadEncoder`
    pub fn chunked() -> Self {
        Self { kind: Kind::Chunked(ChunkedEncoder::new()) }
    }

    /// create a fixed length `PayloadEncoder`
    pub fn fix_length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthEncoder::new(size)) }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(&self.kind, Kind::Chunked(_))
    }

    pub fn is_fix_length(&self) -> bool {
        matches!(&self.kind, Kind::Length(_))
    }

    /// The declared length, `-1` for chunked payloads.
    pub fn content_length(&self) -> i64 {
        match &self.kind {
            Kind::Length(encoder) => i64::try_from(encoder.length()).unwrap_or(i64::MAX),
            Kind::Chunked(_) => -1,
        }
    }

    /// Bytes accounted so far: payload bytes for fixed length, framed bytes for chunked.
    pub fn sent(&self) -> u64 {
        match &self.kind {
            Kind::Length(encoder) => encoder.sent(),
            Kind::Chunked(encoder) => encoder.sent(),
        }
    }

    pub fn is_finish(&self) -> bool {
        match &self.kind {
            Kind::Length(encoder) => encoder.is_finish(),
            Kind::Chunked(encoder) => encoder.is_finish(),
        }
    }

    /// Checks that a fixed length body of `incoming` more bytes is acceptable.
    pub fn check_fixed(&self, incoming: usize) -> Result<(), SendError> {
        match &self.kind {
            Kind::Length(encoder) => encoder.check(incoming),
            Kind::Chunked(_) => {
                warn!("content-length is not set, invalid usage");
                Err(SendError::NotFixedLength)
            }
        }
    }

    /// Checks that a chunk may be sent.
    pub fn check_chunked(&self) -> Result<(), SendError> {
        match &self.kind {
            Kind::Length(_) => {
                warn!("content-length is set, invalid usage");
                Err(SendError::NotChunked)
            }
            Kind::Chunked(_) => Ok(()),
        }
    }
}

impl Default for PayloadEncoder {
    fn default() -> Self {
        Self::chunked()
    }
}

impl<D: Buf> Encoder<D> for PayloadEncoder {
    type Error = SendError;

    fn encode(&mut self, item: D, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match &mut self.kind {
            Kind::Length(encoder) => encoder.encode(item, dst),
            Kind::Chunked(encoder) => encoder.encode(item, dst),
        }
    }
}
