//! HTTP body handling module for processing request and response payloads
//!
//! # Components
//!
//! ## Decoders
//! - [`LengthDecoder`](length_decoder::LengthDecoder): Processes fixed-length request payloads
//! - [`PayloadDecoder`]: Picks the request strategy from the declared payload size
//!
//! ## Encoders
//! - [`ChunkedEncoder`](chunked_encoder::ChunkedEncoder): Implements chunked transfer encoding
//! - [`LengthEncoder`](length_encoder::LengthEncoder): Handles fixed-length payload encoding
//! - [`PayloadEncoder`]: Main encoder that manages different encoding strategies
//!
//! Request side chunked decoding is not implemented, see [`PayloadDecoder`].

mod chunked_encoder;
mod length_decoder;
mod length_encoder;
mod payload_decoder;
mod payload_encoder;

pub use payload_decoder::PayloadDecoder;
pub use payload_encoder::PayloadEncoder;
