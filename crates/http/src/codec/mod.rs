//! HTTP codec module for encoding and decoding HTTP messages
//!
//! This module holds the byte level half of the protocol engine. Everything here works on
//! [`bytes::BytesMut`] buffers through the [`tokio_util::codec`] traits, so the same pieces can be
//! driven by a framed transport or called directly by the [`Session`](crate::session::Session).
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Resumable request parser, one stage per call
//!   - [`parse_request_line`]: Request line and target parsing
//!   - Header line framing and splitting via the [`header`] module
//!   - Body pulling via the [`body`] module
//!
//! - Response handling:
//!   - [`HeaderEncoder`]: Status line and header serialization
//!   - [`PayloadEncoder`]: Fixed length or chunked body framing
//!
//! # Example
//!
//! ```
//! use micro_evhttp::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::default();
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.0\r\n"[..]);
//! let status = decoder.decode(&mut buffer).unwrap();
//! assert!(status.is_some());
//! ```

mod body;
mod header;
mod request_decoder;
mod request_line;

pub use body::PayloadDecoder;
pub use body::PayloadEncoder;
pub use header::HeaderDecoder;
pub use header::HeaderEncoder;
pub use header::HeaderField;
pub use header::ResponseHead;
pub use header::parse_payload;
pub use request_decoder::RequestDecoder;
pub use request_line::RequestLine;
pub use request_line::parse_request_line;
