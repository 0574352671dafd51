use crate::protocol::SendError;
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

/// Writes a body whose size was declared up front through `Content-Length`.
///
/// `sent` counts payload bytes and never exceeds `length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    length: u64,
    sent: u64,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { length, sent: 0 }
    }

    #[inline]
    pub fn length(&self) -> u64 {
        self.length
    }

    #[inline]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn is_finish(&self) -> bool {
        self.sent == self.length
    }

    /// Checks that `incoming` more bytes fit into the declared length.
    pub fn check(&self, incoming: usize) -> Result<(), SendError> {
        if self.length == 0 {
            warn!("content-length is not set, invalid usage");
            return Err(SendError::NotFixedLength);
        }

        if self.sent + incoming as u64 > self.length {
            warn!(sent = self.sent, incoming, declared = self.length, "trying to send more data than declared");
            return Err(SendError::exceed_content_length(self.sent, incoming, self.length));
        }
        Ok(())
    }
}

impl<D: Buf> Encoder<D> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, item: D, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = item.remaining();
        self.check(len)?;

        dst.reserve(len);
        dst.put(item);
        self.sent += len as u64;
        Ok(())
    }
}
