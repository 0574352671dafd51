//! HTTP header processing module for encoding and decoding headers
//!
//! # Components
//!
//! - [`HeaderDecoder`]: Decodes the request head line by line
//!   - Strict CRLF line framing
//!   - Lenient header field splitting
//!   - Header section size limit
//!
//! - [`HeaderEncoder`]: Encodes the response status line and headers
//!   - Headers written in insertion order

mod header_decoder;
mod header_encoder;

pub use header_decoder::parse_payload;
pub use header_decoder::HeaderDecoder;
pub use header_decoder::HeaderField;
pub use header_encoder::HeaderEncoder;
pub use header_encoder::ResponseHead;
